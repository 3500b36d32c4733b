//! Payment Error Types

use serde_json::Value;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Checkout-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// One or more required request fields were absent or blank
    #[error("{message}")]
    MissingFields {
        message: String,
        /// The values that were received, echoed back to the caller
        details: Value,
    },

    /// Request was well-formed JSON but otherwise unusable
    #[error("{0}")]
    InvalidRequest(String),

    /// A price id could not be retrieved from Stripe
    #[error("Invalid price ID provided: {0}")]
    InvalidPrice(String),

    /// Error reported by the Stripe API itself
    #[error("{message}")]
    Provider {
        message: String,
        /// Stripe error type, e.g. `invalid_request_error` or `card_error`
        kind: String,
    },

    /// The setup session does not say which subscription to start
    #[error("Missing subscription price ID in setup session")]
    MissingSetupMetadata,

    /// The setup fee has not been paid yet
    #[error("Setup session {0} has not been completed")]
    SetupIncomplete(String),

    /// Network, serialization or other unexpected failure
    #[error("Payment transport error: {0}")]
    Transport(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Whether the caller or the service is at fault
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    Client,
    Server,
}

impl PaymentError {
    /// Build a missing-fields error echoing the received values
    pub fn missing_fields(details: Value) -> Self {
        Self::MissingFields {
            message: "Missing required fields".into(),
            details,
        }
    }

    pub const fn status_class(&self) -> ErrorClass {
        match self {
            Self::MissingFields { .. }
            | Self::InvalidRequest(_)
            | Self::InvalidPrice(_)
            | Self::Provider { .. }
            | Self::MissingSetupMetadata
            | Self::SetupIncomplete(_) => ErrorClass::Client,
            Self::Transport(_) | Self::Config(_) => ErrorClass::Server,
        }
    }

    /// Stripe-style error type reported alongside the message
    pub fn kind(&self) -> &str {
        match self {
            Self::Provider { kind, .. } => kind,
            Self::InvalidPrice(_) | Self::InvalidRequest(_) | Self::MissingFields { .. } => {
                "invalid_request_error"
            }
            _ => "error",
        }
    }

    /// Message safe to show to the customer
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidPrice(_) => "Invalid price ID provided".into(),
            Self::Transport(_) | Self::Config(_) => "An unexpected error occurred".into(),
            other => other.to_string(),
        }
    }
}

impl From<stripe::StripeError> for PaymentError {
    fn from(err: stripe::StripeError) -> Self {
        match err {
            stripe::StripeError::Stripe(request_error) => {
                let status = request_error.http_status;
                let kind = request_error.error_type.to_string();
                let message = request_error
                    .message
                    .unwrap_or_else(|| format!("Stripe request failed ({status})"));
                Self::Provider { message, kind }
            }
            other => Self::Transport(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes() {
        assert_eq!(PaymentError::MissingSetupMetadata.status_class(), ErrorClass::Client);
        assert_eq!(
            PaymentError::Provider {
                message: "No such price".into(),
                kind: "invalid_request_error".into(),
            }
            .status_class(),
            ErrorClass::Client
        );
        assert_eq!(PaymentError::Transport("timeout".into()).status_class(), ErrorClass::Server);
    }

    #[test]
    fn test_user_message_hides_internals() {
        let err = PaymentError::Transport("connection reset by peer".into());
        assert_eq!(err.user_message(), "An unexpected error occurred");

        let err = PaymentError::InvalidPrice("price_x: No such price".into());
        assert_eq!(err.user_message(), "Invalid price ID provided");
    }
}
