//! Compras: purchase-order approval and payment core
//!
//! Approves project purchase orders in batches (serving them from inventory, from
//! a purchase, or a split of both), queues them for payment, confirms payments and
//! deliveries, and keeps the inventory module informed of purchased stock.

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use modules::approvals;
pub use modules::orders;
pub use modules::payments;
pub use modules::taxes;
