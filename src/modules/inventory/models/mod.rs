mod inventory_item;
mod reservation_line;

pub use inventory_item::{InventoryItem, InventoryMatch};
pub use reservation_line::ReservationLine;
