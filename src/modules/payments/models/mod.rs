mod payment_proof;
mod payment_requests;

pub use payment_proof::PaymentProof;
pub use payment_requests::{
    ConfirmPaymentRequest, PayBatchRequest, PayBulkRequest, PaymentOutcome, QuickPayItem,
    QuickPayRequest, UpdateReceiptRequest,
};
