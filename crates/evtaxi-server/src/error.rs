//! API Errors
//!
//! Maps payment and store failures onto HTTP status codes and the JSON
//! error bodies the frontend reads.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use evtaxi_payments::{ErrorClass, PaymentError};
use evtaxi_store::StoreError;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,

    /// Stripe-style error type, on payment errors
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Received values, on missing-field errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    BadRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Dashboard store not configured")]
    StoreUnavailable,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    fn payment_response(err: PaymentError) -> (StatusCode, ErrorResponse) {
        match err.status_class() {
            ErrorClass::Server => {
                tracing::error!(error = %err, "Checkout failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(err.user_message()).with_kind("error"),
                )
            }
            ErrorClass::Client => {
                tracing::warn!(error = %err, "Checkout request rejected");
                let body = match err {
                    PaymentError::MissingFields { message, details } => ErrorResponse {
                        error: message,
                        kind: None,
                        details: Some(details),
                    },
                    PaymentError::InvalidPrice(_) | PaymentError::Provider { .. } => {
                        ErrorResponse::new(err.user_message()).with_kind(err.kind())
                    }
                    other => ErrorResponse::new(other.user_message()),
                };
                (StatusCode::BAD_REQUEST, body)
            }
        }
    }

    fn store_response(err: StoreError) -> (StatusCode, ErrorResponse) {
        match err {
            StoreError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorResponse::new(err.to_string())),
            StoreError::Validation(message) => {
                tracing::warn!(error = %message, "Dashboard request rejected");
                (StatusCode::BAD_REQUEST, ErrorResponse::new(message))
            }
            other => {
                tracing::error!(error = %other, "Dashboard store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Failed to load dashboard data"),
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Payment(err) => Self::payment_response(err),
            Self::Store(err) => Self::store_response(err),
            Self::BadRequest(message) => {
                tracing::warn!(error = %message, "Bad request");
                (StatusCode::BAD_REQUEST, ErrorResponse::new(message))
            }
            Self::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorResponse::new("Method not allowed"),
            ),
            Self::StoreUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorResponse::new("Dashboard store not configured"),
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn render(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_fields_body() {
        let err = PaymentError::missing_fields(json!({ "priceId": null, "planName": "Starter" }));
        let (status, body) = render(err.into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields");
        assert_eq!(body["details"]["planName"], "Starter");
    }

    #[tokio::test]
    async fn test_invalid_price_body() {
        let (status, body) = render(PaymentError::InvalidPrice("price_x: No such price".into()).into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "error": "Invalid price ID provided", "type": "invalid_request_error" })
        );
    }

    #[tokio::test]
    async fn test_provider_error_keeps_message_and_type() {
        let err = PaymentError::Provider {
            message: "Your card was declined.".into(),
            kind: "card_error".into(),
        };
        let (status, body) = render(err.into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Your card was declined.");
        assert_eq!(body["type"], "card_error");
    }

    #[tokio::test]
    async fn test_transport_error_is_generic() {
        let (status, body) = render(PaymentError::Transport("tls handshake eof".into()).into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "error": "An unexpected error occurred", "type": "error" })
        );
    }

    #[tokio::test]
    async fn test_store_errors() {
        let (status, _) = render(StoreError::not_found("Order 1").into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = render(
            StoreError::Http {
                status: 401,
                message: "JWT expired".into(),
            }
            .into(),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to load dashboard data");

        let (status, _) = render(ApiError::StoreUnavailable).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
