pub mod inventory_effects;
pub mod inventory_gateway;
pub mod mysql_inventory_gateway;
pub mod sku;

pub use inventory_effects::{InventoryEffect, InventoryEffects};
pub use inventory_gateway::InventoryGateway;
pub use mysql_inventory_gateway::MySqlInventoryGateway;
