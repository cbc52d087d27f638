pub mod models;
pub mod repositories;
pub mod services;

pub use models::{OrderStatus, OrderType, OrderWithProject, PurchaseOrder};
pub use repositories::{MySqlOrderRepository, OrderRepository, OrderTransaction};
pub use services::OrderQueryService;
