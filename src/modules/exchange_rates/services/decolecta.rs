use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::rate_gateway::ExchangeRateGateway;
use crate::core::{AppError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.decolecta.com";

/// SUNAT exchange rate client backed by the Decolecta API
///
/// API: `GET {base_url}/v1/tipo-cambio/sunat[?date=YYYY-MM-DD]` with a bearer key.
/// Only the `sell_price` field of the answer is used.
pub struct DecolectaClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SunatRateResponse {
    #[serde(default)]
    sell_price: Option<Decimal>,
}

impl DecolectaClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `api_key` - Decolecta key (from DECOLECTA_API_KEY); an empty key disables lookups
    /// * `base_url` - API base URL (defaults to the public Decolecta host)
    /// * `timeout` - upper bound for the whole request
    pub fn new(api_key: String, base_url: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build rate client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }

    fn url(&self, date: Option<NaiveDate>) -> String {
        match date {
            Some(date) => format!(
                "{}/v1/tipo-cambio/sunat?date={}",
                self.base_url,
                date.format("%Y-%m-%d")
            ),
            None => format!("{}/v1/tipo-cambio/sunat", self.base_url),
        }
    }

    async fn fetch(&self, date: Option<NaiveDate>) -> Result<Option<Decimal>> {
        let response = self
            .client
            .get(self.url(date))
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            tracing::warn!(status = %response.status(), "Exchange rate source answered with an error status");
            return Ok(None);
        }

        let body = response.text().await?;
        Ok(parse_sell_price(&body))
    }
}

/// Extract a usable rate from the response body. Zero, negative or missing rates
/// count as unavailable.
pub fn parse_sell_price(body: &str) -> Option<Decimal> {
    let parsed: SunatRateResponse = serde_json::from_str(body).ok()?;
    parsed.sell_price.filter(|rate| *rate > Decimal::ZERO)
}

#[async_trait]
impl ExchangeRateGateway for DecolectaClient {
    async fn get_rate(&self, date: Option<NaiveDate>) -> Option<Decimal> {
        if self.api_key.trim().is_empty() {
            tracing::warn!("DECOLECTA_API_KEY is not configured, exchange rate unavailable");
            return None;
        }

        match self.fetch(date).await {
            Ok(Some(rate)) => {
                tracing::debug!(rate = %rate, ?date, "Fetched exchange rate");
                Some(rate)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::error!(error = %e, ?date, "Error getting exchange rate");
                None
            }
        }
    }

    fn name(&self) -> &str {
        "decolecta"
    }
}
