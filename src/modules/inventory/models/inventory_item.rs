use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::core::ProjectId;

/// Stock record owned by the inventory module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub quantity: Decimal,
    /// Price of the whole stock record, not per unit
    pub total_price: Decimal,
    pub currency: Option<String>,
    pub unit: Option<String>,
    pub diameter: Option<String>,
    pub series: Option<String>,
    pub material_type: Option<String>,
    pub project_id: Option<ProjectId>,
    pub project_name: Option<String>,
    /// Set-aside ("apartado") flag
    pub set_aside: bool,
}

/// Search result shown to a buyer deciding where an order's goods come from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryMatch {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub available_quantity: Decimal,
    pub total_price: Decimal,
    pub unit_cost: Decimal,
    pub currency: String,
    pub unit: String,
    pub diameter: Option<String>,
    pub series: Option<String>,
    pub material_type: Option<String>,
    pub project_id: Option<ProjectId>,
    pub project_name: Option<String>,
    pub reserved: bool,
    pub available: bool,
}

impl InventoryItem {
    /// `total_price / quantity` to 4 decimal places; the total itself when the record
    /// holds no quantity
    pub fn unit_cost(&self) -> Decimal {
        if self.quantity > Decimal::ZERO {
            (self.total_price / self.quantity)
                .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
        } else {
            self.total_price
        }
    }

    /// Set aside for a project other than `project_id`
    pub fn is_reserved_for_other(&self, project_id: Option<ProjectId>) -> bool {
        match self.project_id {
            Some(owner) if self.set_aside => Some(owner) != project_id,
            _ => false,
        }
    }

    pub fn to_match(&self, project_id: Option<ProjectId>) -> InventoryMatch {
        let reserved = self.is_reserved_for_other(project_id);

        InventoryMatch {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            sku: self.sku.clone(),
            available_quantity: self.quantity,
            total_price: self.total_price,
            unit_cost: self.unit_cost(),
            currency: self.currency.clone().unwrap_or_else(|| "PEN".to_string()),
            unit: self.unit.clone().unwrap_or_else(|| "und".to_string()),
            diameter: self.diameter.clone(),
            series: self.series.clone(),
            material_type: self.material_type.clone(),
            project_id: self.project_id,
            project_name: self.project_name.clone(),
            reserved,
            available: !reserved,
        }
    }
}
