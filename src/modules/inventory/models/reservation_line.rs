use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::Currency;
use crate::modules::orders::models::PurchaseOrder;

const DEFAULT_UNIT: &str = "UND";

/// One purchased line registered in inventory as set-aside stock for a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationLine {
    pub description: String,
    pub qty: Decimal,
    pub unit: String,
    /// Amount paid for the order the line belongs to, in `currency`
    pub subtotal: Decimal,
    pub currency: Currency,
    pub diameter: Option<String>,
    pub series: Option<String>,
    pub material_type: Option<String>,
    pub amount_pen: Decimal,
}

impl ReservationLine {
    /// Lines for every material of `order`, or a single line for the order itself
    /// when it carries no materials. Each line is tagged with the order-level amount.
    pub fn from_order(
        order: &PurchaseOrder,
        amount: Decimal,
        currency: Currency,
        amount_pen: Decimal,
    ) -> Vec<ReservationLine> {
        let order_unit = order.unit.clone().unwrap_or_else(|| DEFAULT_UNIT.to_string());

        if order.materials.is_empty() {
            return vec![ReservationLine {
                description: order.description.clone(),
                qty: Decimal::ONE,
                unit: order_unit,
                subtotal: amount,
                currency,
                diameter: None,
                series: None,
                material_type: None,
                amount_pen,
            }];
        }

        order
            .materials
            .iter()
            .map(|material| ReservationLine {
                description: material
                    .description
                    .clone()
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or_else(|| order.description.clone()),
                qty: material.qty,
                unit: material.unit.clone().unwrap_or_else(|| order_unit.clone()),
                subtotal: amount,
                currency,
                diameter: material.diameter.clone(),
                series: material.series.clone(),
                material_type: material.material_type.clone(),
                amount_pen,
            })
            .collect()
    }
}
