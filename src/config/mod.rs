use crate::core::{AppError, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub exchange_rate: ExchangeRateConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

/// Daily SUNAT exchange rate source
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeRateConfig {
    pub api_key: String,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl ExchangeRateConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "debug".to_string()),
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            exchange_rate: ExchangeRateConfig {
                // An empty key is allowed: PEN-only operation keeps working
                api_key: env::var("DECOLECTA_API_KEY").unwrap_or_default(),
                base_url: env::var("EXCHANGE_RATE_BASE_URL")
                    .ok()
                    .filter(|url| !url.trim().is_empty()),
                timeout_secs: env::var("EXCHANGE_RATE_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid EXCHANGE_RATE_TIMEOUT_SECS".to_string())
                    })?,
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.exchange_rate.timeout_secs == 0 {
            return Err(AppError::Configuration(
                "Exchange rate timeout must be greater than 0".to_string(),
            ));
        }

        self.database.validate()
    }
}
