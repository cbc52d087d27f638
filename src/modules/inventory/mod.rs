pub mod models;
pub mod services;

pub use models::{InventoryItem, InventoryMatch, ReservationLine};
pub use services::{InventoryEffect, InventoryEffects, InventoryGateway, MySqlInventoryGateway};
