pub mod decolecta;
pub mod rate_gateway;

pub use decolecta::DecolectaClient;
pub use rate_gateway::{rate_for, ExchangeRateGateway};
