pub mod approval_service;
pub mod batch_id;

pub use approval_service::ApprovalService;
pub use batch_id::{single_order_batch_id, BatchKind};
