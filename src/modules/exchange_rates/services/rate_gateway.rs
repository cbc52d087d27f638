use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::core::{AppError, Currency, Result};

/// Source of the PEN per USD sell rate
///
/// Implementations never fail: a missing key, a transport error, a non-200 answer
/// or an unusable body all come back as `None`. Callers decide what an absent rate
/// means for their operation.
#[async_trait]
pub trait ExchangeRateGateway: Send + Sync {
    /// Sell rate for `date`, or for today when `date` is `None`
    async fn get_rate(&self, date: Option<NaiveDate>) -> Option<Decimal>;

    /// Gateway name for logs
    fn name(&self) -> &str;
}

/// The rate an operation in `currency` needs: `None` for PEN, the gateway's rate for
/// USD. A USD operation without a rate is rejected.
pub async fn rate_for(
    gateway: &dyn ExchangeRateGateway,
    currency: Currency,
) -> Result<Option<Decimal>> {
    if !currency.requires_exchange_rate() {
        return Ok(None);
    }

    match gateway.get_rate(None).await {
        Some(rate) => Ok(Some(rate)),
        None => {
            tracing::warn!(gateway = gateway.name(), %currency, "No exchange rate available");
            Err(AppError::ExternalRateUnavailable)
        }
    }
}
