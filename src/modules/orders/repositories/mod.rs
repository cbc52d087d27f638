pub mod mysql_order_repository;
pub mod order_repository;

pub use mysql_order_repository::{MySqlOrderRepository, MySqlOrderTransaction};
pub use order_repository::{
    transition, OrderFilter, OrderRepository, OrderTransaction, StatusTotal,
};
