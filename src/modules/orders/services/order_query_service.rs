// Read side of the purchasing workflow: the listings buyers and approvers work from.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::{AppError, OrderId, ProjectId, Result};
use crate::modules::inventory::{InventoryGateway, InventoryMatch};
use crate::modules::orders::models::{OrderStatus, OrderType, OrderWithProject, Seller};
use crate::modules::orders::repositories::{OrderFilter, OrderRepository};

const MIN_SEARCH_LENGTH: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderStats {
    pub pending: usize,
    pub to_pay: usize,
    pub approved: usize,
    pub rejected: usize,
    /// Sum of `amount` over approved orders
    pub total_approved_amount: Decimal,
}

pub struct OrderQueryService {
    orders: Arc<dyn OrderRepository>,
    inventory: Arc<dyn InventoryGateway>,
}

impl OrderQueryService {
    pub fn new(orders: Arc<dyn OrderRepository>, inventory: Arc<dyn InventoryGateway>) -> Self {
        Self { orders, inventory }
    }

    /// All orders, optionally of one status, in item-number order
    pub async fn list(&self, status: Option<OrderStatus>) -> Result<Vec<OrderWithProject>> {
        let filter = status.map(OrderFilter::with_status).unwrap_or_default();
        self.orders.list(&filter).await
    }

    /// Material orders waiting for a fulfillment decision, oldest first
    pub async fn pending(&self) -> Result<Vec<OrderWithProject>> {
        let filter = OrderFilter {
            order_type: Some(OrderType::Material),
            ..OrderFilter::with_status(OrderStatus::Pending)
        };
        let mut orders = self.orders.list(&filter).await?;
        orders.sort_by_key(|row| (row.order.created_at, row.order.id));
        Ok(orders)
    }

    pub async fn to_pay(&self) -> Result<Vec<OrderWithProject>> {
        let mut orders = self
            .orders
            .list(&OrderFilter::with_status(OrderStatus::ToPay))
            .await?;
        orders.sort_by_key(|row| (row.order.created_at, row.order.id));
        Ok(orders)
    }

    /// Approved orders still waiting for payment, most recently approved first
    pub async fn approved_unpaid(&self) -> Result<Vec<OrderWithProject>> {
        let filter = OrderFilter {
            payment_confirmed: Some(false),
            ..OrderFilter::with_status(OrderStatus::Approved)
        };
        let mut orders = self.orders.list(&filter).await?;
        orders.sort_by(|a, b| b.order.approved_at.cmp(&a.order.approved_at));
        Ok(orders)
    }

    pub async fn paid(&self) -> Result<Vec<OrderWithProject>> {
        let filter = OrderFilter {
            payment_confirmed: Some(true),
            ..OrderFilter::with_status(OrderStatus::Approved)
        };
        let mut orders = self.orders.list(&filter).await?;
        orders.sort_by(|a, b| b.order.payment_confirmed_at.cmp(&a.order.payment_confirmed_at));
        Ok(orders)
    }

    pub async fn delivered(&self) -> Result<Vec<OrderWithProject>> {
        let filter = OrderFilter {
            delivery_confirmed: Some(true),
            ..OrderFilter::default()
        };
        let mut orders = self.orders.list(&filter).await?;
        orders.sort_by(|a, b| b.order.delivery_confirmed_at.cmp(&a.order.delivery_confirmed_at));
        Ok(orders)
    }

    pub async fn show(&self, id: OrderId) -> Result<OrderWithProject> {
        self.orders
            .find_with_project(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {}", id)))
    }

    /// Order counts per status, counted by the store
    pub async fn stats(&self) -> Result<OrderStats> {
        let totals = self.orders.status_totals().await?;

        Ok(totals.into_iter().fold(OrderStats::default(), |mut stats, total| {
            let count = total.orders as usize;
            match total.status {
                OrderStatus::Pending => stats.pending = count,
                OrderStatus::ToPay => stats.to_pay = count,
                OrderStatus::Approved => {
                    stats.approved = count;
                    stats.total_approved_amount = total.amount;
                }
                OrderStatus::Rejected => stats.rejected = count,
            }
            stats
        }))
    }

    /// Distinct sellers of approved orders, for autocompletion
    pub async fn sellers(&self) -> Result<Vec<Seller>> {
        self.orders.distinct_sellers(OrderStatus::Approved).await
    }

    pub async fn search_inventory(
        &self,
        query: &str,
        project_id: Option<ProjectId>,
    ) -> Result<Vec<InventoryMatch>> {
        if query.trim().chars().count() < MIN_SEARCH_LENGTH {
            return Err(AppError::validation(format!(
                "Search text must have at least {} characters",
                MIN_SEARCH_LENGTH
            )));
        }

        self.inventory.search(query, project_id).await
    }
}
