//! # evtaxi-payments
//!
//! Stripe Checkout (Hosted) flows for the EV Taxi booking kits.
//!
//! **Flow:** pricing page → redirect to Stripe's hosted page → redirect back
//!
//! ```text
//! ┌─────────────┐     ┌─────────────────┐     ┌─────────────┐
//! │   EV Taxi   │────▶│  Stripe Hosted  │────▶│   EV Taxi   │
//! │  (pricing)  │     │  Checkout Page  │     │  (success)  │
//! └─────────────┘     └─────────────────┘     └─────────────┘
//! ```
//!
//! The flows in [`CheckoutService`] talk to Stripe through the
//! [`PaymentGateway`] trait. [`StripeClient`] is the real implementation,
//! [`MockGateway`] keeps everything in memory.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use evtaxi_payments::{CheckoutService, CheckoutUrls, CreateCheckoutRequest, StripeClient};
//!
//! let gateway = Arc::new(StripeClient::new("sk_test_xxx"));
//! let checkout = CheckoutService::new(gateway, CheckoutUrls::new("https://evtaxi.app"));
//!
//! let session = checkout.create_checkout(&CreateCheckoutRequest {
//!     price_id: Some("price_123".into()),
//!     plan_name: Some("Starter".into()),
//!     ..Default::default()
//! }).await?;
//!
//! // Redirect user to: session.url
//! ```

mod checkout;
mod error;
mod gateway;
mod mock;
mod stripe_gateway;

pub use checkout::{
    CHECKOUT_SOURCE, CheckoutService, CheckoutSession, CheckoutUrls, CreateCheckoutRequest,
    CreateSubscriptionRequest, SESSION_TTL_MINUTES, SetupSessionRequest, VerifiedSession,
    VerifySessionRequest,
};
pub use error::{ErrorClass, PaymentError, Result};
pub use gateway::{
    CreatedSession, LineItem, Metadata, PaymentGateway, PriceInfo, SESSION_ID_PLACEHOLDER,
    SessionDetails, SessionMode, SessionParams,
};
pub use mock::MockGateway;
pub use stripe_gateway::StripeClient;
