use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where the buyer wants an order's goods to come from, as submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitSource {
    Inventory,
    Split,
    #[default]
    External,
}

/// Per-order inventory instruction as it arrives in a bulk request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitInstruction {
    #[serde(default)]
    pub source_type: SplitSource,
    #[serde(default)]
    pub inventory_item_id: Option<u64>,
    #[serde(default)]
    pub qty_from_inventory: Option<Decimal>,
    #[serde(default)]
    pub qty_to_buy: Option<Decimal>,
    #[serde(default)]
    pub reference_price: Option<Decimal>,
}

/// Fulfillment strategy of one order, decided once at the request boundary
#[derive(Debug, Clone, PartialEq)]
pub enum FulfillmentInstruction {
    /// Goods fully covered by stock on hand
    Inventory {
        inventory_item_id: Option<u64>,
        qty_from_inventory: Decimal,
        /// Imputed cost; the order's price is used when absent
        reference_price: Option<Decimal>,
    },
    /// Part of the quantity comes from stock, the rest is bought
    Split {
        inventory_item_id: Option<u64>,
        qty_from_inventory: Decimal,
        qty_to_buy: Decimal,
        reference_price: Decimal,
    },
    /// Regular purchase from a seller
    External,
}

impl From<&SplitInstruction> for FulfillmentInstruction {
    fn from(split: &SplitInstruction) -> Self {
        let qty_from_inventory = split.qty_from_inventory.unwrap_or(Decimal::ZERO);
        let buys_something = split.qty_to_buy.map_or(false, |qty| qty > Decimal::ZERO);

        match split.source_type {
            SplitSource::Inventory if !buys_something => FulfillmentInstruction::Inventory {
                inventory_item_id: split.inventory_item_id,
                qty_from_inventory,
                reference_price: split.reference_price,
            },
            SplitSource::Split if qty_from_inventory > Decimal::ZERO => FulfillmentInstruction::Split {
                inventory_item_id: split.inventory_item_id,
                qty_from_inventory,
                qty_to_buy: split.qty_to_buy.unwrap_or(Decimal::ZERO),
                reference_price: split.reference_price.unwrap_or(Decimal::ZERO),
            },
            _ => FulfillmentInstruction::External,
        }
    }
}

impl FulfillmentInstruction {
    /// Strategy for an order with no instruction at all
    pub fn for_order(split: Option<&SplitInstruction>) -> Self {
        split.map_or(FulfillmentInstruction::External, FulfillmentInstruction::from)
    }

    pub fn is_external(&self) -> bool {
        matches!(self, FulfillmentInstruction::External)
    }
}
