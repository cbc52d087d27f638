use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};
use crate::modules::orders::models::ProofUpdate;

/// Stored path of an uploaded proof of payment and/or a link to it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentProof {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl PaymentProof {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            file: Some(path.into()),
            link: None,
        }
    }

    pub fn link(url: impl Into<String>) -> Self {
        Self {
            file: None,
            link: Some(url.into()),
        }
    }

    pub fn normalized(&self) -> Self {
        fn clean(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        }

        Self {
            file: clean(&self.file),
            link: clean(&self.link),
        }
    }

    pub fn is_empty(&self) -> bool {
        let normalized = self.normalized();
        normalized.file.is_none() && normalized.link.is_none()
    }

    pub fn require_any(&self) -> Result<()> {
        if self.is_empty() {
            return Err(AppError::validation(
                "A proof of payment file or link is required",
            ));
        }
        Ok(())
    }

    pub fn replace(&self) -> ProofUpdate {
        let normalized = self.normalized();
        ProofUpdate::Replace {
            file: normalized.file,
            link: normalized.link,
        }
    }

    pub fn merge(&self) -> ProofUpdate {
        let normalized = self.normalized();
        ProofUpdate::Merge {
            file: normalized.file,
            link: normalized.link,
        }
    }
}
