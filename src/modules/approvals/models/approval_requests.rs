use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::fulfillment::{FulfillmentInstruction, SplitInstruction};
use crate::core::{AppError, OrderId, Result};
use crate::modules::orders::models::InvoiceDetails;

const MIN_AMOUNT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);
/// 999,999,999,999.99, the largest value the DECIMAL(14,2) money columns hold
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

/// Approve pending orders into one batch, choosing a fulfillment strategy per order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproveBatchRequest {
    pub order_ids: Vec<OrderId>,
    /// Purchase price per order in the request currency; missing means zero
    #[serde(default)]
    pub prices: HashMap<OrderId, Decimal>,
    pub invoice: InvoiceDetails,
    #[serde(default)]
    pub inventory_splits: HashMap<OrderId, SplitInstruction>,
}

impl ApproveBatchRequest {
    pub fn price_of(&self, id: OrderId) -> Decimal {
        self.prices.get(&id).copied().unwrap_or(Decimal::ZERO)
    }

    /// Validate the request and resolve every order's strategy, in request order
    pub fn plan(&self) -> Result<Vec<(OrderId, FulfillmentInstruction)>> {
        validate_order_ids(&self.order_ids)?;
        self.invoice.validate()?;

        // Zero or negative prices mean "leave pending"; only the ceiling applies here
        for (id, price) in &self.prices {
            check_ceiling(*id, "price", *price)?;
        }

        let mut plan = Vec::with_capacity(self.order_ids.len());
        for &id in &self.order_ids {
            let instruction = FulfillmentInstruction::for_order(self.inventory_splits.get(&id));

            match &instruction {
                FulfillmentInstruction::Split {
                    qty_from_inventory,
                    qty_to_buy,
                    reference_price,
                    ..
                } => {
                    if *qty_to_buy < Decimal::ZERO {
                        return Err(AppError::validation(format!(
                            "Order {}: quantity to buy cannot be negative",
                            id
                        )));
                    }
                    check_ceiling(id, "quantity from inventory", *qty_from_inventory)?;
                    check_ceiling(id, "quantity to buy", *qty_to_buy)?;
                    check_ceiling(id, "reference price", *reference_price)?;
                }
                FulfillmentInstruction::Inventory {
                    qty_from_inventory,
                    reference_price,
                    ..
                } => {
                    check_ceiling(id, "quantity from inventory", *qty_from_inventory)?;
                    check_ceiling(id, "reference price", reference_price.unwrap_or(Decimal::ZERO))?;
                }
                FulfillmentInstruction::External => {}
            }

            plan.push((id, instruction));
        }

        Ok(plan)
    }
}

/// Approve pending orders directly (no payment queue) with one shared invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproveBulkRequest {
    pub order_ids: Vec<OrderId>,
    pub prices: HashMap<OrderId, Decimal>,
    pub invoice: InvoiceDetails,
}

impl ApproveBulkRequest {
    pub fn validate(&self) -> Result<()> {
        validate_order_ids(&self.order_ids)?;
        validate_prices(&self.prices)?;
        self.invoice.validate()
    }
}

/// Approve one pending order at a price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproveOrderRequest {
    pub amount: Decimal,
    pub invoice: InvoiceDetails,
}

impl ApproveOrderRequest {
    pub fn validate(&self) -> Result<()> {
        if self.amount < MIN_AMOUNT {
            return Err(AppError::validation("Amount must be at least 0.01"));
        }
        if self.amount > MAX_AMOUNT {
            return Err(AppError::validation(format!("Amount cannot exceed {}", MAX_AMOUNT)));
        }
        self.invoice.validate()
    }
}

/// At least one id and no id twice
pub fn validate_order_ids(ids: &[OrderId]) -> Result<()> {
    if ids.is_empty() {
        return Err(AppError::validation("order_ids must contain at least one order"));
    }

    let mut seen = HashSet::with_capacity(ids.len());
    if let Some(duplicate) = ids.iter().find(|id| !seen.insert(**id)) {
        return Err(AppError::validation(format!(
            "Order {} appears more than once",
            duplicate
        )));
    }

    Ok(())
}

/// Every supplied price is between 0.01 and [`MAX_AMOUNT`]
pub fn validate_prices(prices: &HashMap<OrderId, Decimal>) -> Result<()> {
    for (id, price) in prices {
        if *price < MIN_AMOUNT {
            return Err(AppError::validation(format!(
                "Price of order {} must be at least 0.01",
                id
            )));
        }
        check_ceiling(*id, "price", *price)?;
    }

    Ok(())
}

fn check_ceiling(id: OrderId, what: &str, value: Decimal) -> Result<()> {
    if value > MAX_AMOUNT {
        return Err(AppError::validation(format!(
            "Order {}: {} cannot exceed {}",
            id, what, MAX_AMOUNT
        )));
    }
    Ok(())
}
