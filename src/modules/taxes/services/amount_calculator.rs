use rust_decimal::Decimal;

use crate::core::{AppError, Currency, Result};
use crate::modules::taxes::models::{IgvSettings, OrderAmounts};

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// AmountCalculator converts an order amount into PEN and applies IGV
pub struct AmountCalculator;

impl AmountCalculator {
    /// Compute PEN amount, IGV and total for one order.
    ///
    /// Conversion only happens for USD with a rate present; callers reject USD
    /// requests without a rate before reaching this point. Request amounts are capped
    /// well below the decimal range, but the rate comes from outside, so every step is
    /// checked and an overflow is reported instead of panicking.
    pub fn calculate_amounts(
        amount: Decimal,
        currency: Currency,
        exchange_rate: Option<Decimal>,
        igv_enabled: bool,
        igv_rate: Decimal,
    ) -> Result<OrderAmounts> {
        let amount_pen = match (currency, exchange_rate) {
            (Currency::USD, Some(rate)) => amount
                .checked_mul(rate)
                .ok_or_else(|| out_of_range(amount))?,
            _ => amount,
        };

        let igv_amount = if igv_enabled {
            amount_pen
                .checked_mul(igv_rate)
                .and_then(|v| v.checked_div(ONE_HUNDRED))
                .ok_or_else(|| out_of_range(amount))?
        } else {
            Decimal::ZERO
        };

        let total_with_igv = amount_pen
            .checked_add(igv_amount)
            .ok_or_else(|| out_of_range(amount))?;

        Ok(OrderAmounts {
            amount_pen,
            igv_amount,
            total_with_igv,
        })
    }

    /// Same as [`calculate_amounts`](Self::calculate_amounts) with the shared IGV settings
    pub fn for_settings(
        amount: Decimal,
        currency: Currency,
        exchange_rate: Option<Decimal>,
        igv: IgvSettings,
    ) -> Result<OrderAmounts> {
        Self::calculate_amounts(amount, currency, exchange_rate, igv.enabled, igv.rate)
    }

    /// PEN equivalent only, used for inventory reservation lines
    pub fn convert_to_pen(
        amount: Decimal,
        currency: Currency,
        exchange_rate: Option<Decimal>,
    ) -> Result<Decimal> {
        Self::calculate_amounts(amount, currency, exchange_rate, false, Decimal::ZERO)
            .map(|amounts| amounts.amount_pen)
    }

    /// IGV rate is a percentage between 0 and 100 with at most 2 decimal places
    pub fn validate_igv_rate(igv_rate: Decimal) -> Result<()> {
        if igv_rate < Decimal::ZERO {
            return Err(AppError::validation("IGV rate cannot be negative"));
        }

        if igv_rate > ONE_HUNDRED {
            return Err(AppError::validation("IGV rate cannot exceed 100%"));
        }

        if igv_rate.normalize().scale() > 2 {
            return Err(AppError::validation(
                "IGV rate cannot have more than 2 decimal places",
            ));
        }

        Ok(())
    }
}

fn out_of_range(amount: Decimal) -> AppError {
    AppError::validation(format!("Amount {} is out of range after conversion", amount))
}
