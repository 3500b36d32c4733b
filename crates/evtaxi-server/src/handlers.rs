//! Site and Checkout Handlers

use axum::{Json, extract::State, http::StatusCode};
use evtaxi_core::{PricedPlan, SiteContent};
use evtaxi_payments::{
    CheckoutSession, CreateCheckoutRequest, CreateSubscriptionRequest, SetupSessionRequest,
    VerifiedSession, VerifySessionRequest,
};
use serde::Serialize;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub payments: String,
    pub store: Option<String>,
    pub store_connected: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (store, store_connected) = match state.store.as_deref() {
        Some(store) => {
            let connected = match store.health_check().await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(store = store.name(), error = %e, "Store health check failed");
                    false
                }
            };
            (Some(store.name().to_string()), connected)
        }
        None => (None, false),
    };

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        payments: state.checkout.gateway().name().to_string(),
        store,
        store_connected,
    })
}

/// Plan catalog for the pricing section
pub async fn list_plans(State(state): State<AppState>) -> Json<Vec<PricedPlan>> {
    Json(state.plans.as_ref().clone())
}

/// Landing page copy
pub async fn site_content() -> Json<SiteContent> {
    Json(SiteContent::get())
}

/// Single-price checkout, or setup fee + subscription when the body carries
/// `subscriptionPriceId`/`setupPriceId`
pub async fn create_checkout_session(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateCheckoutRequest>,
) -> Result<Json<CheckoutSession>, ApiError> {
    Ok(Json(state.checkout.create_checkout(&payload).await?))
}

/// Split flow step 1: setup fee only
pub async fn create_setup_session(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SetupSessionRequest>,
) -> Result<Json<CheckoutSession>, ApiError> {
    Ok(Json(state.checkout.create_setup_session(&payload).await?))
}

/// Split flow step 2: subscription for the customer from step 1
pub async fn create_subscription(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateSubscriptionRequest>,
) -> Result<Json<CheckoutSession>, ApiError> {
    Ok(Json(
        state.checkout.create_subscription_from_setup(&payload).await?,
    ))
}

pub async fn verify_session(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<VerifySessionRequest>,
) -> Result<Json<VerifiedSession>, ApiError> {
    Ok(Json(state.checkout.verify_session(&payload).await?))
}

/// Fallback for a known path hit with the wrong method
/// Bare `OPTIONS` outside a CORS preflight
pub async fn options_ok() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
