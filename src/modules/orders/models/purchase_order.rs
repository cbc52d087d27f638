// PurchaseOrder entity and its workflow enums.
//
// Orders are created `pending` by the projects module, move to `to_pay` or
// `approved` through the approval engine, get `payment_confirmed` through the
// payment engine and finally `delivery_confirmed`. `rejected` is terminal.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::material_line::MaterialLine;
use super::order_patch::{OrderPatch, ProofUpdate};
use crate::core::{ActorId, Currency, OrderId, ProjectId};
use crate::modules::taxes::{OrderAmounts, DEFAULT_IGV_RATE};

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($name), s)),
                }
            }
        }
    };
}

string_enum! {
    /// Primary workflow state of an order
    OrderStatus {
        Pending => "pending",
        ToPay => "to_pay",
        Approved => "approved",
        Rejected => "rejected",
    }
}

string_enum! {
    OrderType {
        Service => "service",
        Material => "material",
    }
}

string_enum! {
    /// Where the goods of an order come from
    SourceType {
        External => "external",
        Inventory => "inventory",
    }
}

string_enum! {
    PaymentType {
        Cash => "cash",
        Loan => "loan",
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl Default for SourceType {
    fn default() -> Self {
        SourceType::External
    }
}

impl Default for PaymentType {
    fn default() -> Self {
        PaymentType::Cash
    }
}

/// A purchase order row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: OrderId,
    pub project_id: ProjectId,
    pub item_number: u32,

    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub description: String,
    pub unit: Option<String>,
    pub materials: Vec<MaterialLine>,

    pub amount: Option<Decimal>,
    pub currency: Currency,
    pub exchange_rate: Option<Decimal>,
    pub amount_pen: Option<Decimal>,
    pub igv_enabled: bool,
    pub igv_rate: Decimal,
    pub igv_amount: Option<Decimal>,
    pub total_with_igv: Option<Decimal>,

    pub status: OrderStatus,

    pub source_type: SourceType,
    pub inventory_item_id: Option<u64>,
    pub reference_price: Option<Decimal>,
    /// Order this row was split off from; a back-reference, not ownership
    pub parent_order_id: Option<OrderId>,

    pub batch_id: Option<String>,

    pub created_by: Option<ActorId>,
    pub approved_by: Option<ActorId>,
    pub approved_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,

    pub seller_name: Option<String>,
    pub seller_document: Option<String>,
    pub payment_type: Option<PaymentType>,
    pub issue_date: Option<NaiveDate>,
    pub payment_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,

    pub payment_confirmed: bool,
    pub payment_confirmed_at: Option<DateTime<Utc>>,
    pub payment_confirmed_by: Option<ActorId>,
    pub cdp_type: Option<String>,
    pub cdp_serie: Option<String>,
    pub cdp_number: Option<String>,
    pub payment_proof: Option<String>,
    pub payment_proof_link: Option<String>,

    pub delivery_confirmed: bool,
    pub delivery_confirmed_at: Option<DateTime<Utc>>,
    pub delivery_confirmed_by: Option<ActorId>,
    pub delivery_notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PurchaseOrder {
    /// A fresh pending order, the shape the projects module creates
    pub fn new_pending(
        project_id: ProjectId,
        item_number: u32,
        order_type: OrderType,
        description: impl Into<String>,
        materials: Vec<MaterialLine>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: 0,
            project_id,
            item_number,
            order_type,
            description: description.into(),
            unit: None,
            materials,
            amount: None,
            currency: Currency::PEN,
            exchange_rate: None,
            amount_pen: None,
            igv_enabled: false,
            igv_rate: DEFAULT_IGV_RATE,
            igv_amount: None,
            total_with_igv: None,
            status: OrderStatus::Pending,
            source_type: SourceType::External,
            inventory_item_id: None,
            reference_price: None,
            parent_order_id: None,
            batch_id: None,
            created_by: None,
            approved_by: None,
            approved_at: None,
            notes: None,
            seller_name: None,
            seller_document: None,
            payment_type: None,
            issue_date: None,
            payment_date: None,
            due_date: None,
            payment_confirmed: false,
            payment_confirmed_at: None,
            payment_confirmed_by: None,
            cdp_type: None,
            cdp_serie: None,
            cdp_number: None,
            payment_proof: None,
            payment_proof_link: None,
            delivery_confirmed: false,
            delivery_confirmed_at: None,
            delivery_confirmed_by: None,
            delivery_notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_material(&self) -> bool {
        self.order_type == OrderType::Material
    }

    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    /// PEN-side money currently stored on the row
    pub fn amounts(&self) -> OrderAmounts {
        OrderAmounts {
            amount_pen: self.amount_pen.unwrap_or(Decimal::ZERO),
            igv_amount: self.igv_amount.unwrap_or(Decimal::ZERO),
            total_with_igv: self.total_with_igv.unwrap_or(Decimal::ZERO),
        }
    }

    /// Apply a patch in memory, mirroring what the SQL store writes
    pub fn apply(&mut self, patch: &OrderPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(source_type) = patch.source_type {
            self.source_type = source_type;
        }
        if let Some(money) = &patch.money {
            self.amount = Some(money.amount);
            self.amount_pen = Some(money.amounts.amount_pen);
            self.igv_amount = Some(money.amounts.igv_amount);
            self.total_with_igv = Some(money.amounts.total_with_igv);
        }
        if let Some(invoice) = &patch.invoice {
            self.batch_id = Some(invoice.batch_id.clone());
            self.currency = invoice.currency;
            self.exchange_rate = invoice.exchange_rate;
            self.seller_name = Some(invoice.seller_name.clone());
            self.seller_document = invoice.seller_document.clone();
            self.payment_type = Some(invoice.payment_type);
            self.issue_date = invoice.issue_date;
            self.payment_date = invoice.payment_date;
            self.due_date = invoice.due_date;
            self.igv_enabled = invoice.igv_enabled;
            self.igv_rate = invoice.igv_rate;
        }
        if let Some(approval) = &patch.approval {
            self.approved_by = Some(approval.by);
            self.approved_at = Some(approval.at);
            if let Some(notes) = &approval.notes {
                self.notes = Some(notes.clone());
            }
        }
        if let Some(source) = &patch.inventory_source {
            self.inventory_item_id = source.inventory_item_id;
            self.reference_price = Some(source.reference_price);
        }
        if let Some(materials) = &patch.materials {
            self.materials = materials.clone();
        }
        if let Some(payment) = &patch.payment {
            self.payment_confirmed = true;
            self.payment_confirmed_at = Some(payment.at);
            self.payment_confirmed_by = Some(payment.by);
        }
        if let Some(receipt) = &patch.receipt {
            self.cdp_type = receipt.cdp_type.clone();
            self.cdp_serie = receipt.cdp_serie.clone();
            self.cdp_number = receipt.cdp_number.clone();
        }
        match &patch.proof {
            Some(ProofUpdate::Replace { file, link }) => {
                self.payment_proof = file.clone();
                self.payment_proof_link = link.clone();
            }
            Some(ProofUpdate::Merge { file, link }) => {
                if file.is_some() {
                    self.payment_proof = file.clone();
                }
                if link.is_some() {
                    self.payment_proof_link = link.clone();
                }
            }
            None => {}
        }
        if let Some(delivery) = &patch.delivery {
            self.delivery_confirmed = true;
            self.delivery_confirmed_at = Some(delivery.at);
            self.delivery_confirmed_by = Some(delivery.by);
            if delivery.notes.is_some() {
                self.delivery_notes = delivery.notes.clone();
            }
        }
        self.updated_at = patch.updated_at;
    }
}

/// Order joined with the owning project's name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderWithProject {
    #[serde(flatten)]
    pub order: PurchaseOrder,
    pub project_name: String,
}
