mod approval_requests;
mod approval_summary;
mod fulfillment;

pub use approval_requests::{
    validate_order_ids, validate_prices, ApproveBatchRequest, ApproveBulkRequest,
    ApproveOrderRequest, MAX_AMOUNT,
};
pub use approval_summary::{ApprovalOutcome, ApproveBatchSummary, BulkApprovalSummary};
pub use fulfillment::{FulfillmentInstruction, SplitInstruction, SplitSource};
