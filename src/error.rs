//! Sanskriti error types
//!
//! Errors only travel between the store client and the
//! [`StoreAdapter`](crate::store::StoreAdapter). Everything above the adapter
//! sees empty tables or missing images instead.

/// Sanskriti error types
#[derive(Debug, thiserror::Error)]
pub enum SanskritiError {
    // Transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("store API error ({status}, code {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("statement {handle} still running after {attempts} polls")]
    StatementTimeout { handle: String, attempts: u32 },

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("data error: {0}")]
    DataError(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("data source does not support this operation")]
    Unsupported,
}

impl From<reqwest::Error> for SanskritiError {
    fn from(err: reqwest::Error) -> Self {
        SanskritiError::Http(err.to_string())
    }
}

/// Result type alias for Sanskriti operations
pub type Result<T> = std::result::Result<T, SanskritiError>;
