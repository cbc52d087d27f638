pub mod models;
pub mod services;

pub use models::{
    ConfirmPaymentRequest, PayBatchRequest, PayBulkRequest, PaymentOutcome, PaymentProof,
    QuickPayItem, QuickPayRequest, UpdateReceiptRequest,
};
pub use services::PaymentService;
