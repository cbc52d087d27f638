use serde::Serialize;

/// Seller identity as recorded on approved orders
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Seller {
    pub seller_name: String,
    pub seller_document: Option<String>,
}
