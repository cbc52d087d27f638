// Order Store contracts.
//
// Reads that do not take part in a workflow go through `OrderRepository`. Every
// engine operation opens one `OrderTransaction`, performs its precondition check and
// writes through it, then commits. Dropping the transaction without calling
// `commit` rolls it back.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::core::{AppError, OrderId, ProjectId, Result};
use crate::modules::orders::models::{
    OrderPatch, OrderStatus, OrderType, OrderWithProject, PurchaseOrder, Seller,
};

/// Optional filters for order listings. `None` means "any".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub statuses: Option<Vec<OrderStatus>>,
    pub order_type: Option<OrderType>,
    pub project_id: Option<ProjectId>,
    pub payment_confirmed: Option<bool>,
    pub delivery_confirmed: Option<bool>,
}

impl OrderFilter {
    pub fn with_status(status: OrderStatus) -> Self {
        Self {
            statuses: Some(vec![status]),
            ..Self::default()
        }
    }

    /// True when `order` passes every filter that is set
    pub fn matches(&self, order: &PurchaseOrder) -> bool {
        self.statuses
            .as_ref()
            .map_or(true, |statuses| statuses.contains(&order.status))
            && self.order_type.map_or(true, |t| order.order_type == t)
            && self.project_id.map_or(true, |p| order.project_id == p)
            && self
                .payment_confirmed
                .map_or(true, |c| order.payment_confirmed == c)
            && self
                .delivery_confirmed
                .map_or(true, |c| order.delivery_confirmed == c)
    }
}

/// Number of orders in one status and the sum of their `amount`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusTotal {
    pub status: OrderStatus,
    pub orders: u64,
    pub amount: Decimal,
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_id(&self, id: OrderId) -> Result<Option<PurchaseOrder>>;

    async fn find_with_project(&self, id: OrderId) -> Result<Option<OrderWithProject>>;

    /// Orders with their project name, ordered by project then item number
    async fn list(&self, filter: &OrderFilter) -> Result<Vec<OrderWithProject>>;

    /// One entry per status that has orders; a missing `amount` counts as zero
    async fn status_totals(&self) -> Result<Vec<StatusTotal>>;

    /// Distinct sellers with a non-blank name among orders in `status`, sorted
    async fn distinct_sellers(&self, status: OrderStatus) -> Result<Vec<Seller>>;

    async fn begin(&self) -> Result<Box<dyn OrderTransaction>>;
}

#[async_trait]
pub trait OrderTransaction: Send {
    async fn find_by_id(&mut self, id: OrderId) -> Result<Option<PurchaseOrder>>;

    /// True when every id exists and has `status`. Implementations lock the rows they
    /// read so the following guarded writes see the same state.
    async fn all_have_status(&mut self, ids: &[OrderId], statuses: &[OrderStatus]) -> Result<bool>;

    async fn update_by_id(&mut self, id: OrderId, patch: &OrderPatch) -> Result<u64>;

    /// Update only the rows among `ids` whose status is one of `expected`; returns the
    /// number of rows written
    async fn update_where_status(
        &mut self,
        ids: &[OrderId],
        expected: &[OrderStatus],
        patch: &OrderPatch,
    ) -> Result<u64>;

    /// Insert a new row and return its id. `order.id` is ignored.
    async fn insert(&mut self, order: &PurchaseOrder) -> Result<OrderId>;

    async fn update_where_batch(
        &mut self,
        batch_id: &str,
        current_status: OrderStatus,
        patch: &OrderPatch,
    ) -> Result<u64>;

    /// Update every payment-confirmed row of a batch
    async fn update_confirmed_batch(&mut self, batch_id: &str, patch: &OrderPatch) -> Result<u64>;

    async fn find_with_project(&mut self, ids: &[OrderId]) -> Result<Vec<OrderWithProject>>;

    async fn find_batch_with_project(&mut self, batch_id: &str) -> Result<Vec<OrderWithProject>>;

    /// `max(item_number) + 1` within the project, 1 for an empty project
    async fn next_item_number(&mut self, project_id: ProjectId) -> Result<u32>;

    async fn commit(self: Box<Self>) -> Result<()>;
}

/// Move every order in `ids` out of `expected` with one guarded write. Fails with
/// `PreconditionFailed` when any row had already left `expected`; the caller's
/// transaction is then dropped and nothing is kept.
pub async fn transition(
    tx: &mut dyn OrderTransaction,
    ids: &[OrderId],
    expected: &[OrderStatus],
    patch: &OrderPatch,
) -> Result<()> {
    let affected = tx.update_where_status(ids, expected, patch).await?;

    if affected != ids.len() as u64 {
        tracing::warn!(
            expected = ids.len(),
            affected,
            "Guarded status update matched fewer orders than requested"
        );
        return Err(AppError::precondition("Some orders were already processed"));
    }

    Ok(())
}
