pub mod approvals;
pub mod exchange_rates;
pub mod health;
pub mod inventory;
pub mod orders;
pub mod payments;
pub mod projects;
pub mod taxes;
