use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

const SKU_PREFIX: &str = "INV-";

/// Stock keeping unit for a purchased line: `INV-` and 8 hex characters of a
/// digest over batch, description and the registration instant
pub fn generate_sku(batch_id: &str, description: &str, at: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(batch_id.as_bytes());
    hasher.update(description.as_bytes());
    hasher.update(at.timestamp_nanos_opt().unwrap_or_default().to_string().as_bytes());

    let digest = hex::encode(hasher.finalize());
    format!("{}{}", SKU_PREFIX, &digest[..8])
}
