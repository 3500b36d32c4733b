//! Request Extractors

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use crate::error::ApiError;

/// JSON request body with the API's own error bodies.
///
/// Unlike `axum::Json` it does not insist on a `Content-Type` header. An
/// empty body, malformed JSON and a field of the wrong type each get their
/// own message.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(ApiError::bad_request("Request body is required"));
        }

        serde_json::from_slice(&bytes).map(Self).map_err(|e| {
            tracing::debug!(error = %e, "Rejected request body");
            match e.classify() {
                Category::Data => ApiError::bad_request(format!("Invalid field in request body: {e}")),
                Category::Io | Category::Syntax | Category::Eof => {
                    ApiError::bad_request("Invalid JSON in request body")
                }
            }
        })
    }
}
