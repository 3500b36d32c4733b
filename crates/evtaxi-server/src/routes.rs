//! Router
//!
//! API routes, security headers and the static frontend fallback.

use axum::{
    Router,
    http::{HeaderValue, header},
    routing::{MethodRouter, get, patch, post},
};
use tower_http::{
    services::{ServeDir, ServeFile},
    set_header::SetResponseHeaderLayer,
};

use crate::dashboard;
use crate::handlers::{
    create_checkout_session, create_setup_session, create_subscription, health_check, list_plans,
    method_not_allowed, options_ok, site_content, verify_session,
};
use crate::state::AppState;

/// Answer `OPTIONS` and attach the JSON 405 body to a route
fn json_405(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.options(options_ok).fallback(method_not_allowed)
}

/// API routes with security headers
pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health & site
        .route("/health", json_405(get(health_check)))
        .route("/api/plans", json_405(get(list_plans)))
        .route("/api/content", json_405(get(site_content)))
        // Checkout
        .route(
            "/api/stripe/create-checkout-session",
            json_405(post(create_checkout_session)),
        )
        .route(
            "/api/stripe/create-setup-session",
            json_405(post(create_setup_session)),
        )
        .route("/api/stripe/create-subscription", json_405(post(create_subscription)))
        .route("/api/stripe/verify-session", json_405(post(verify_session)))
        // Customer dashboard
        .route("/api/orders", json_405(get(dashboard::list_orders)))
        .route("/api/orders/shipments", json_405(get(dashboard::list_shipments)))
        .route("/api/orders/{id}", json_405(get(dashboard::get_order)))
        // Admin dashboard
        .route("/api/admin/stats", json_405(get(dashboard::admin_stats)))
        .route("/api/admin/customers", json_405(get(dashboard::list_customers)))
        .route(
            "/api/admin/inventory",
            json_405(get(dashboard::list_inventory).post(dashboard::create_inventory)),
        )
        .route(
            "/api/admin/inventory/{id}",
            json_405(
                patch(dashboard::update_inventory)
                    .delete(dashboard::delete_inventory),
            ),
        )
        .with_state(state)
}

/// Full application: API routes, then the frontend for everything else
pub fn app(state: AppState, static_dir: &str) -> Router {
    let index = format!("{static_dir}/index.html");
    let frontend = ServeDir::new(static_dir).not_found_service(ServeFile::new(index));

    api_router(state)
        .fallback_service(frontend)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
}
