use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::payment_proof::PaymentProof;
use crate::core::{AppError, Currency, LimaClock, OrderId, ProjectId, Result};
use crate::modules::approvals::models::{validate_order_ids, validate_prices, MAX_AMOUNT};
use crate::modules::orders::models::{InvoiceDetails, PaymentType, ReceiptFields};

/// Confirm payment of every `to_pay` order of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayBatchRequest {
    pub batch_id: String,
    #[serde(default)]
    pub receipt: ReceiptFields,
    #[serde(default)]
    pub proof: PaymentProof,
}

impl PayBatchRequest {
    pub fn validate(&self) -> Result<()> {
        if self.batch_id.trim().is_empty() {
            return Err(AppError::validation("batch_id is required"));
        }
        Ok(())
    }
}

/// One purchased line of a quick payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickPayItem {
    pub description: String,
    #[serde(default = "default_qty")]
    pub qty: Decimal,
    #[serde(default)]
    pub unit: Option<String>,
    /// Amount paid for the line, in the request currency
    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub diameter: Option<String>,
    #[serde(default)]
    pub series: Option<String>,
    #[serde(default)]
    pub material_type: Option<String>,
}

fn default_qty() -> Decimal {
    Decimal::ONE
}

impl QuickPayItem {
    pub fn new(description: impl Into<String>, qty: Decimal, subtotal: Decimal) -> Self {
        Self {
            description: description.into(),
            qty,
            unit: None,
            subtotal,
            diameter: None,
            series: None,
            material_type: None,
        }
    }
}

/// Purchases made and paid on the spot: one new approved, paid order per item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickPayRequest {
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    #[serde(default)]
    pub seller_name: String,
    #[serde(default)]
    pub seller_document: Option<String>,
    #[serde(default)]
    pub payment_type: PaymentType,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub items: Vec<QuickPayItem>,
    #[serde(default)]
    pub receipt: ReceiptFields,
    #[serde(default)]
    pub proof: PaymentProof,
}

impl QuickPayRequest {
    /// Checks every required field; returns the project id
    pub fn validate(&self) -> Result<ProjectId> {
        let project_id = self
            .project_id
            .filter(|id| *id > 0)
            .ok_or_else(|| AppError::validation("project_id is required"))?;

        if self.seller_name.trim().is_empty() {
            return Err(AppError::validation("seller_name is required"));
        }
        if self
            .seller_document
            .as_deref()
            .map_or(true, |d| d.trim().is_empty())
        {
            return Err(AppError::validation("seller_document is required"));
        }
        if self.items.is_empty() {
            return Err(AppError::validation("At least one item is required"));
        }
        if let Some(index) = self
            .items
            .iter()
            .position(|item| item.description.trim().is_empty())
        {
            return Err(AppError::validation(format!(
                "Item {} needs a description",
                index + 1
            )));
        }
        if let Some(index) = self.items.iter().position(|item| item.subtotal < Decimal::ZERO) {
            return Err(AppError::validation(format!(
                "Item {} has a negative subtotal",
                index + 1
            )));
        }
        if let Some(index) = self
            .items
            .iter()
            .position(|item| item.subtotal > MAX_AMOUNT || item.qty > MAX_AMOUNT)
        {
            return Err(AppError::validation(format!(
                "Item {} exceeds the largest amount an order can hold",
                index + 1
            )));
        }
        self.proof.require_any()?;

        Ok(project_id)
    }

    /// Invoice view of the request, paid today. Quick payments carry no IGV.
    pub fn invoice(&self) -> InvoiceDetails {
        InvoiceDetails {
            seller_document: self.seller_document.clone(),
            payment_type: self.payment_type,
            issue_date: self.issue_date,
            payment_date: Some(LimaClock::today()),
            due_date: self.due_date,
            ..InvoiceDetails::new(self.currency, self.seller_name.clone())
        }
    }
}

/// Approve and pay `to_pay` orders in one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayBulkRequest {
    pub order_ids: Vec<OrderId>,
    pub prices: HashMap<OrderId, Decimal>,
    pub invoice: InvoiceDetails,
}

impl PayBulkRequest {
    pub fn validate(&self) -> Result<()> {
        validate_order_ids(&self.order_ids)?;
        validate_prices(&self.prices)?;
        self.invoice.validate()
    }

    pub fn price_of(&self, id: OrderId) -> Decimal {
        self.prices.get(&id).copied().unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmPaymentRequest {
    pub receipt: ReceiptFields,
    #[serde(default)]
    pub proof: PaymentProof,
}

impl ConfirmPaymentRequest {
    pub fn validate(&self) -> Result<()> {
        if !self.receipt.is_complete() {
            return Err(AppError::validation(
                "cdp_type, cdp_serie and cdp_number are required",
            ));
        }
        self.proof.require_any()
    }
}

/// Correct the receipt of an already paid batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateReceiptRequest {
    pub batch_id: String,
    pub receipt: ReceiptFields,
    #[serde(default)]
    pub proof: PaymentProof,
}

impl UpdateReceiptRequest {
    pub fn validate(&self) -> Result<()> {
        if self.batch_id.trim().is_empty() {
            return Err(AppError::validation("batch_id is required"));
        }
        if !self.receipt.is_complete() {
            return Err(AppError::validation(
                "cdp_type, cdp_serie and cdp_number are required",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    /// Orders written by the operation
    pub orders: usize,
}

impl PaymentOutcome {
    pub fn new(message: impl Into<String>, batch_id: Option<String>, orders: usize) -> Self {
        Self {
            success: true,
            message: message.into(),
            batch_id,
            orders,
        }
    }
}
