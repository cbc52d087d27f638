// Typed column groups written by the engines.
//
// Each group is written as a whole: `None` leaves the columns untouched, `Some`
// overwrites every column in the group (nullable columns included).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::material_line::MaterialLine;
use super::purchase_order::{OrderStatus, PaymentType, SourceType};
use crate::core::{ActorId, Currency};
use crate::modules::taxes::OrderAmounts;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
    pub source_type: Option<SourceType>,
    pub money: Option<MoneyFields>,
    pub invoice: Option<InvoiceFields>,
    pub approval: Option<ApprovalStamp>,
    pub inventory_source: Option<InventorySource>,
    pub materials: Option<Vec<MaterialLine>>,
    pub payment: Option<Stamp>,
    pub receipt: Option<ReceiptFields>,
    pub proof: Option<ProofUpdate>,
    pub delivery: Option<DeliveryStamp>,
    pub updated_at: DateTime<Utc>,
}

impl OrderPatch {
    /// Empty patch that only bumps `updated_at`
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            updated_at: now,
            ..Self::default()
        }
    }
}

/// `amount` in the order currency plus its PEN-side figures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoneyFields {
    pub amount: Decimal,
    pub amounts: OrderAmounts,
}

impl MoneyFields {
    pub fn zero() -> Self {
        Self {
            amount: Decimal::ZERO,
            amounts: OrderAmounts::ZERO,
        }
    }
}

/// Seller, dates, currency and tax settings shared by one bulk request
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceFields {
    pub batch_id: String,
    pub currency: Currency,
    pub exchange_rate: Option<Decimal>,
    pub seller_name: String,
    pub seller_document: Option<String>,
    pub payment_type: PaymentType,
    pub issue_date: Option<NaiveDate>,
    pub payment_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub igv_enabled: bool,
    pub igv_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalStamp {
    pub by: ActorId,
    pub at: DateTime<Utc>,
    /// `None` keeps the stored notes
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InventorySource {
    pub inventory_item_id: Option<u64>,
    pub reference_price: Decimal,
}

/// Actor and time of a confirmation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stamp {
    pub by: ActorId,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryStamp {
    pub by: ActorId,
    pub at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Fiscal receipt (comprobante de pago) identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptFields {
    #[serde(default)]
    pub cdp_type: Option<String>,
    #[serde(default)]
    pub cdp_serie: Option<String>,
    #[serde(default)]
    pub cdp_number: Option<String>,
}

impl ReceiptFields {
    /// Blank strings are stored as NULL
    pub fn normalized(&self) -> Self {
        fn clean(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        }

        Self {
            cdp_type: clean(&self.cdp_type),
            cdp_serie: clean(&self.cdp_serie),
            cdp_number: clean(&self.cdp_number),
        }
    }

    pub fn is_complete(&self) -> bool {
        let normalized = self.normalized();
        normalized.cdp_type.is_some()
            && normalized.cdp_serie.is_some()
            && normalized.cdp_number.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofUpdate {
    /// Overwrite both proof columns, clearing the absent one
    Replace {
        file: Option<String>,
        link: Option<String>,
    },
    /// Only overwrite the columns that were supplied
    Merge {
        file: Option<String>,
        link: Option<String>,
    },
}
