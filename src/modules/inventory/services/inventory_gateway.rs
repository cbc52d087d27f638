use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::core::{OrderId, ProjectId, Result};
use crate::modules::inventory::models::{InventoryMatch, ReservationLine};

/// Contract of the inventory module as seen by the purchasing workflow
///
/// `deduct_stock` and `register_purchased_items` are bookkeeping side effects of an
/// order transition. Their errors are returned so callers can log them, but no caller
/// lets them undo an order change.
#[async_trait]
pub trait InventoryGateway: Send + Sync {
    /// Stock records matching `query` with quantity left, items free for
    /// `project_id` first
    async fn search(&self, query: &str, project_id: Option<ProjectId>) -> Result<Vec<InventoryMatch>>;

    /// Take `qty` off the item's quantity, never below zero. A missing item id or a
    /// non-positive quantity is a no-op.
    async fn deduct_stock(&self, item_id: Option<u64>, qty: Decimal, order_id: OrderId) -> Result<()>;

    /// Store purchased lines as stock set aside for `project_id`
    async fn register_purchased_items(
        &self,
        project_id: ProjectId,
        items: &[ReservationLine],
        batch_id: &str,
        project_name: &str,
    ) -> Result<()>;
}
