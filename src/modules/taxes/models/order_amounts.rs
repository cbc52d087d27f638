use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::Currency;

/// Default IGV percentage applied when a request does not specify one
pub const DEFAULT_IGV_RATE: Decimal = Decimal::from_parts(1800, 0, 0, false, 2);

/// PEN-side money of a purchase order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAmounts {
    /// Amount converted to PEN
    pub amount_pen: Decimal,
    /// IGV on top of `amount_pen`, zero when IGV is disabled
    pub igv_amount: Decimal,
    /// `amount_pen + igv_amount`
    pub total_with_igv: Decimal,
}

impl OrderAmounts {
    pub const ZERO: OrderAmounts = OrderAmounts {
        amount_pen: Decimal::ZERO,
        igv_amount: Decimal::ZERO,
        total_with_igv: Decimal::ZERO,
    };

    /// Round to the PEN column scale. The total is rebuilt from the rounded parts so
    /// `total_with_igv == amount_pen + igv_amount` holds exactly in storage.
    pub fn rounded(&self) -> Self {
        let amount_pen = Currency::PEN.round(self.amount_pen);
        let igv_amount = Currency::PEN.round(self.igv_amount);

        Self {
            amount_pen,
            igv_amount,
            total_with_igv: amount_pen + igv_amount,
        }
    }
}

/// IGV settings shared by every order of a bulk request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IgvSettings {
    pub enabled: bool,
    pub rate: Decimal,
}

impl Default for IgvSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            rate: DEFAULT_IGV_RATE,
        }
    }
}
