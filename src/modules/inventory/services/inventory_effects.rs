// Inventory side effects of an order transition.
//
// Engines collect effects while their transaction is open and apply them once it has
// committed. Each effect is attempted independently; a failure is logged and the
// remaining effects still run.

use rust_decimal::Decimal;

use super::inventory_gateway::InventoryGateway;
use crate::core::{Currency, OrderId, ProjectId};
use crate::modules::inventory::models::ReservationLine;
use crate::modules::orders::models::OrderWithProject;

#[derive(Debug, Clone, PartialEq)]
pub enum InventoryEffect {
    Deduct {
        item_id: Option<u64>,
        qty: Decimal,
        order_id: OrderId,
    },
    Register {
        project_id: ProjectId,
        items: Vec<ReservationLine>,
        batch_id: String,
        project_name: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryEffects {
    effects: Vec<InventoryEffect>,
}

impl InventoryEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deduct(&mut self, item_id: Option<u64>, qty: Decimal, order_id: OrderId) {
        self.effects.push(InventoryEffect::Deduct {
            item_id,
            qty,
            order_id,
        });
    }

    /// Register the materials of a purchased order tagged with the amount paid for it
    pub fn register_order(
        &mut self,
        row: &OrderWithProject,
        amount: Decimal,
        currency: Currency,
        amount_pen: Decimal,
        batch_id: &str,
    ) {
        self.push_register(
            row.order.project_id,
            ReservationLine::from_order(&row.order, amount, currency, amount_pen),
            batch_id,
            &row.project_name,
        );
    }

    pub fn push_register(
        &mut self,
        project_id: ProjectId,
        items: Vec<ReservationLine>,
        batch_id: &str,
        project_name: &str,
    ) {
        self.effects.push(InventoryEffect::Register {
            project_id,
            items,
            batch_id: batch_id.to_string(),
            project_name: project_name.to_string(),
        });
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InventoryEffect> {
        self.effects.iter()
    }

    /// Run every effect against `gateway`. Returns the number of effects that failed.
    pub async fn apply(self, gateway: &dyn InventoryGateway) -> usize {
        let mut failed = 0;

        for effect in self.effects {
            let outcome = match &effect {
                InventoryEffect::Deduct {
                    item_id,
                    qty,
                    order_id,
                } => gateway.deduct_stock(*item_id, *qty, *order_id).await,
                InventoryEffect::Register {
                    project_id,
                    items,
                    batch_id,
                    project_name,
                } => {
                    gateway
                        .register_purchased_items(*project_id, items, batch_id, project_name)
                        .await
                }
            };

            if let Err(e) = outcome {
                failed += 1;
                tracing::warn!(
                    error = %e,
                    effect = ?effect,
                    "Inventory bookkeeping failed; order changes are kept"
                );
            }
        }

        failed
    }
}
