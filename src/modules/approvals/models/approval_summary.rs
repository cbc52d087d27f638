use rust_decimal::Decimal;
use serde::Serialize;

/// Result of approving a batch of orders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApproveBatchSummary {
    pub success: bool,
    pub batch_id: String,
    /// Orders (or split siblings) served from stock, already paid and delivered
    pub fulfilled_from_inventory: usize,
    /// Orders now waiting for payment, split originals included
    pub routed_to_purchase: usize,
    /// External orders left pending because no positive price was given
    pub skipped: usize,
    pub message: String,
}

impl ApproveBatchSummary {
    pub fn new(batch_id: String, fulfilled_from_inventory: usize, routed_to_purchase: usize, skipped: usize) -> Self {
        let message = match (routed_to_purchase, fulfilled_from_inventory) {
            (purchase, inventory) if purchase > 0 && inventory > 0 => format!(
                "{} routed to payment, {} fulfilled from inventory (delivered)",
                purchase, inventory
            ),
            (0, inventory) if inventory > 0 => format!("{} orders covered from inventory", inventory),
            (purchase, _) => format!("{} orders sent to payment", purchase),
        };

        Self {
            success: true,
            batch_id,
            fulfilled_from_inventory,
            routed_to_purchase,
            skipped,
            message,
        }
    }
}

/// Result of approving a single order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovalOutcome {
    pub success: bool,
    pub message: String,
    pub exchange_rate: Option<Decimal>,
    pub amount_pen: Decimal,
}

/// Result of a direct bulk approval
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkApprovalSummary {
    pub success: bool,
    pub batch_id: String,
    pub approved: usize,
    pub message: String,
}
