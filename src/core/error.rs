use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Malformed or missing request input, detected before any transaction opens
    #[error("Validation error: {0}")]
    Validation(String),

    /// Orders are not in the status the operation requires
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// USD operation without an exchange rate from the rate source
    #[error("Exchange rate unavailable")]
    ExternalRateUnavailable,

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database operation errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        HttpResponse::build(status_code).json(serde_json::json!({
            "success": false,
            "error": {
                "message": self.public_message(),
                "code": status_code.as_u16(),
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PreconditionFailed(_) => StatusCode::BAD_REQUEST,
            AppError::ExternalRateUnavailable => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::HttpClient(_) => StatusCode::BAD_GATEWAY,
            AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        AppError::PreconditionFailed(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// True for failures the caller caused; these never roll back committed work
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Log the error of `operation` and hand it back. Client errors are expected
    /// outcomes; anything else aborted a transaction and is logged with full detail.
    pub fn logged(self, operation: &str) -> Self {
        if self.is_client_error() {
            tracing::info!(operation, error = %self, "Request rejected");
        } else {
            tracing::error!(operation, error = ?self, "Operation failed, changes rolled back");
        }
        self
    }

    /// Message safe to return to callers. Server-side failures are collapsed into a
    /// generic message; the full error is only written to the log.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(_)
            | AppError::Configuration(_)
            | AppError::HttpClient(_)
            | AppError::Internal(_) => "Internal error while processing the orders".to_string(),
            other => other.to_string(),
        }
    }
}
