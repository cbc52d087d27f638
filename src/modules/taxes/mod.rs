pub mod models;
pub mod services;

pub use models::{IgvSettings, OrderAmounts, DEFAULT_IGV_RATE};
pub use services::AmountCalculator;
