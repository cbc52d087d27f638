mod invoice_details;
mod material_line;
mod order_patch;
mod purchase_order;
mod seller;

pub use invoice_details::InvoiceDetails;
pub use material_line::MaterialLine;
pub use order_patch::{
    ApprovalStamp, DeliveryStamp, InventorySource, InvoiceFields, MoneyFields, OrderPatch,
    ProofUpdate, ReceiptFields, Stamp,
};
pub use purchase_order::{
    OrderStatus, OrderType, OrderWithProject, PaymentType, PurchaseOrder, SourceType,
};
pub use seller::Seller;
