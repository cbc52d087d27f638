use crate::core::{AppError, Result};
use serde::Deserialize;
use std::env;

/// Bootstrap HTTP server (health endpoint and request logging)
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(
            env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| AppError::Configuration("Invalid SERVER_PORT".to_string()))?,
        ))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
