//! Store Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, StoreError>;

/// Dashboard data access errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// No row with the requested id
    #[error("{0} not found")]
    NotFound(String),

    /// The store answered with a non-success status
    #[error("Store returned {status}: {message}")]
    Http { status: u16, message: String },

    /// Could not reach the store
    #[error("Network error: {0}")]
    Network(String),

    /// Response body did not match the expected rows
    #[error("Failed to decode store response: {0}")]
    Decode(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rejected input
    #[error("{0}")]
    Validation(String),
}

impl StoreError {
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NotFound(what.to_string())
    }
}

#[cfg(feature = "supabase")]
impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
