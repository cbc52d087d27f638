use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of an order's `materials` JSON column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default = "default_qty")]
    pub qty: Decimal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_type: Option<String>,

    /// Quantity before the line was split between inventory and purchase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_qty: Option<Decimal>,

    /// Position inside the project's bill of materials, used for display ordering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_number: Option<u32>,
}

fn default_qty() -> Decimal {
    Decimal::ONE
}

impl MaterialLine {
    pub fn new(description: impl Into<String>, qty: Decimal) -> Self {
        Self {
            description: Some(description.into()),
            qty,
            unit: None,
            diameter: None,
            series: None,
            material_type: None,
            original_qty: None,
            item_number: None,
        }
    }

    /// Decode the `materials` column. Empty or null columns yield no lines.
    pub fn decode_list(raw: Option<&str>) -> serde_json::Result<Vec<MaterialLine>> {
        match raw.map(str::trim) {
            None | Some("") | Some("null") => Ok(Vec::new()),
            Some(json) => serde_json::from_str(json),
        }
    }

    pub fn encode_list(lines: &[MaterialLine]) -> serde_json::Result<String> {
        serde_json::to_string(lines)
    }

    /// Copy of `lines` with every quantity replaced. When `keep_original` is set the
    /// previous quantity is preserved in `original_qty`.
    pub fn with_quantity(lines: &[MaterialLine], qty: Decimal, keep_original: bool) -> Vec<MaterialLine> {
        lines
            .iter()
            .map(|line| MaterialLine {
                qty,
                original_qty: if keep_original {
                    Some(line.original_qty.unwrap_or(line.qty))
                } else {
                    line.original_qty
                },
                ..line.clone()
            })
            .collect()
    }
}
