use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order_patch::InvoiceFields;
use super::purchase_order::PaymentType;
use crate::core::{AppError, Currency, Result};
use crate::modules::taxes::{AmountCalculator, IgvSettings, DEFAULT_IGV_RATE};

/// Invoice metadata a caller supplies once for a whole bulk request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDetails {
    pub currency: Currency,
    pub seller_name: String,
    #[serde(default)]
    pub seller_document: Option<String>,
    #[serde(default)]
    pub payment_type: PaymentType,
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub igv_enabled: bool,
    #[serde(default = "default_igv_rate")]
    pub igv_rate: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_igv_rate() -> Decimal {
    DEFAULT_IGV_RATE
}

impl InvoiceDetails {
    pub fn new(currency: Currency, seller_name: impl Into<String>) -> Self {
        Self {
            currency,
            seller_name: seller_name.into(),
            seller_document: None,
            payment_type: PaymentType::Cash,
            issue_date: None,
            payment_date: None,
            due_date: None,
            igv_enabled: false,
            igv_rate: DEFAULT_IGV_RATE,
            notes: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.seller_name.trim().is_empty() {
            return Err(AppError::validation("seller_name is required"));
        }

        AmountCalculator::validate_igv_rate(self.igv_rate)?;

        Ok(())
    }

    pub fn igv(&self) -> IgvSettings {
        IgvSettings {
            enabled: self.igv_enabled,
            rate: self.igv_rate,
        }
    }

    /// Cash purchases keep only the payment date, loans only the due date
    pub fn effective_dates(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        match self.payment_type {
            PaymentType::Cash => (self.payment_date, None),
            PaymentType::Loan => (None, self.due_date),
        }
    }

    /// Column values shared by every order written under `batch_id`
    pub fn to_fields(&self, batch_id: &str, exchange_rate: Option<Decimal>) -> InvoiceFields {
        let (payment_date, due_date) = self.effective_dates();

        InvoiceFields {
            batch_id: batch_id.to_string(),
            currency: self.currency,
            exchange_rate,
            seller_name: self.seller_name.trim().to_string(),
            seller_document: self.seller_document.clone(),
            payment_type: self.payment_type,
            issue_date: self.issue_date,
            payment_date,
            due_date,
            igv_enabled: self.igv_enabled,
            igv_rate: self.igv_rate,
        }
    }
}
