use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::{LimaClock, OrderId};

/// Operation that groups orders under one batch id
///
/// The prefix only helps people reading the id; nothing parses it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    /// Batch approval with per-order fulfillment (`approve_batch`)
    Approval,
    /// Direct bulk approval (`approve_bulk`)
    Bulk,
    /// Bulk payment (`pay_bulk`)
    Payment,
    /// Orders created and paid in one step (`quick_pay`)
    QuickPay,
}

impl BatchKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            BatchKind::Approval => "AP",
            BatchKind::Bulk => "BATCH",
            BatchKind::Payment => "PAY",
            BatchKind::QuickPay => "QP",
        }
    }

    /// `PREFIX-YYYYMMDD-XXXXXXXXXXXX`, dated in Lima business time, with 48 random bits
    pub fn generate_at(&self, now: DateTime<Utc>) -> String {
        let random = Uuid::new_v4().simple().to_string().to_uppercase();
        format!(
            "{}-{}-{}",
            self.prefix(),
            LimaClock::business_date(now).format("%Y%m%d"),
            &random[..12]
        )
    }

    pub fn generate(&self) -> String {
        self.generate_at(Utc::now())
    }
}

/// Batch id for a single order that never got one: the day and the order id
pub fn single_order_batch_id(kind: BatchKind, order_id: OrderId, now: DateTime<Utc>) -> String {
    format!(
        "{}-{}-{}",
        kind.prefix(),
        LimaClock::business_date(now).format("%Y%m%d"),
        order_id
    )
}
