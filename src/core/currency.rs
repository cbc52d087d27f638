use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies accepted on purchase orders. Every amount is also carried in PEN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Peruvian Sol (2 decimal places), the ledger currency
    #[default]
    PEN,
    /// US Dollar (2 decimal places), converted with the SUNAT sell rate
    USD,
}

impl Currency {
    /// Returns the decimal scale for this currency
    pub fn scale(&self) -> u32 {
        2
    }

    /// Rounds a decimal value to the appropriate scale for this currency
    pub fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp(self.scale())
    }

    /// Whether amounts in this currency need an exchange rate to reach PEN
    pub fn requires_exchange_rate(&self) -> bool {
        matches!(self, Currency::USD)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::PEN => "PEN",
            Currency::USD => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PEN" => Ok(Currency::PEN),
            "USD" => Ok(Currency::USD),
            _ => Err(format!("Invalid currency: {}", s)),
        }
    }
}
