pub mod models;
pub mod services;

pub use models::{
    ApproveBatchRequest, ApproveBatchSummary, ApproveBulkRequest, ApproveOrderRequest,
    FulfillmentInstruction, SplitInstruction, MAX_AMOUNT,
};
pub use services::{ApprovalService, BatchKind};
