pub mod services;

pub use services::{rate_for, DecolectaClient, ExchangeRateGateway};
