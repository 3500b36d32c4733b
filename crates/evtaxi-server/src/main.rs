//! EV Taxi HTTP Server
//!
//! Axum-based server for the booking-kit site: Stripe checkout endpoints,
//! the customer and admin dashboard API, and the WASM frontend.

mod config;
mod dashboard;
mod error;
mod extract;
mod handlers;
mod routes;
mod state;

use std::sync::Arc;

use anyhow::Context;
use axum::http::{HeaderName, Method, header};
use evtaxi_payments::{CheckoutService, CheckoutUrls, MockGateway, PaymentGateway, StripeClient};
use evtaxi_store::{DashboardStore, MemoryStore, SupabaseConfig, SupabaseStore};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{PaymentsMode, ServerConfig, StoreMode};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment first so RUST_LOG from .env applies
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().context("invalid server configuration")?;

    // Initialize payments
    let gateway: Arc<dyn PaymentGateway> = match &config.payments {
        PaymentsMode::Stripe { secret_key } => {
            tracing::info!("✓ Stripe configured");
            Arc::new(StripeClient::new(secret_key))
        }
        PaymentsMode::Mock => {
            tracing::warn!("⚠ PAYMENTS_MODE=mock - checkout sessions are not real");
            Arc::new(MockGateway::new().with_prices(
                config
                    .prices
                    .values()
                    .flat_map(|p| [p.price_id.clone(), p.setup_price_id.clone()])
                    .flatten(),
            ))
        }
    };

    let plans = config.priced_plans();
    for plan in &plans {
        if !plan.prices.is_purchasable() {
            tracing::warn!(plan = %plan.plan.id, "⚠ Stripe prices not configured");
        }
    }

    // Initialize dashboard store
    let store: Option<Arc<dyn DashboardStore>> = match &config.store {
        StoreMode::Supabase { url, service_key } => {
            let store = SupabaseStore::new(SupabaseConfig::new(url, service_key))
                .context("failed to build Supabase client")?;
            match store.health_check().await {
                Ok(()) => tracing::info!("✓ Connected to Supabase"),
                Err(e) => tracing::warn!(error = %e, "⚠ Supabase not reachable - dashboard requests will fail"),
            }
            Some(Arc::new(store))
        }
        StoreMode::Memory => {
            tracing::warn!("⚠ STORE_MODE=memory - dashboard data is not persisted");
            Some(Arc::new(MemoryStore::new()))
        }
        StoreMode::Disabled => {
            tracing::warn!("⚠ Supabase not configured - dashboard disabled");
            tracing::warn!("  Set SUPABASE_URL and SUPABASE_SERVICE_KEY in .env");
            None
        }
    };

    // Build application state
    let state = AppState {
        checkout: Arc::new(CheckoutService::new(
            gateway,
            CheckoutUrls::new(&config.site_url),
        )),
        store,
        plans: Arc::new(plans),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("authorization")]);

    // Build router
    let app = routes::app(state, &config.static_dir)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚕 EV Taxi server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                             - Health check");
    tracing::info!("  GET  /api/plans                          - Plan catalog");
    tracing::info!("  POST /api/stripe/create-checkout-session - Start checkout");
    tracing::info!("  POST /api/stripe/create-setup-session    - Setup fee checkout");
    tracing::info!("  POST /api/stripe/create-subscription     - Subscription after setup");
    tracing::info!("  POST /api/stripe/verify-session          - Verify checkout");
    tracing::info!("  GET  /api/orders?user_id=                - Customer orders");
    tracing::info!("  GET  /api/admin/stats                    - Admin dashboard");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
