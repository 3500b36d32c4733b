//! Payment Gateway
//!
//! The seam between the checkout flows and the payment provider. The flows
//! describe a hosted checkout with [`SessionParams`]; an implementation turns
//! that into provider API calls.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Key/value pairs attached to a session
pub type Metadata = HashMap<String, String>;

/// Placeholder the provider replaces with the session id in redirect URLs
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Hosted checkout mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Starts a recurring subscription
    Subscription,
    /// One-time payment
    Payment,
}

/// One line of a checkout
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub price_id: String,
    pub quantity: u64,
}

impl LineItem {
    pub fn single(price_id: impl Into<String>) -> Self {
        Self {
            price_id: price_id.into(),
            quantity: 1,
        }
    }
}

/// Provider-neutral description of a hosted checkout session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionParams {
    pub mode: SessionMode,
    pub line_items: Vec<LineItem>,

    /// Existing customer to attach the session to
    pub customer: Option<String>,

    pub metadata: Metadata,

    /// Copied onto the resulting subscription (subscription mode only)
    pub subscription_metadata: Option<Metadata>,

    /// Description on the payment (payment mode only)
    pub payment_description: Option<String>,

    pub success_url: String,
    pub cancel_url: String,

    pub require_billing_address: bool,
    pub collect_phone_number: bool,
    pub collect_tax_id: bool,
    pub allow_promotion_codes: bool,

    /// Always create a customer, so later sessions can reuse it (payment mode only)
    pub always_create_customer: bool,

    /// Unix timestamp after which the session can no longer be completed
    pub expires_at: Option<i64>,
}

impl SessionParams {
    /// Bare session with no collection options enabled
    pub fn new(
        mode: SessionMode,
        line_items: Vec<LineItem>,
        success_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        Self {
            mode,
            line_items,
            customer: None,
            metadata: Metadata::new(),
            subscription_metadata: None,
            payment_description: None,
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
            require_billing_address: false,
            collect_phone_number: false,
            collect_tax_id: false,
            allow_promotion_codes: false,
            always_create_customer: false,
            expires_at: None,
        }
    }
}

/// A session the provider just created
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedSession {
    pub id: String,

    /// Hosted checkout page to redirect the customer to
    pub url: Option<String>,
}

/// A session read back from the provider
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDetails {
    pub id: String,

    /// `open`, `complete` or `expired`
    pub status: Option<String>,

    /// `paid`, `unpaid` or `no_payment_required`
    pub payment_status: Option<String>,

    pub customer: Option<String>,
    pub subscription: Option<String>,
    pub setup_intent: Option<String>,
    pub payment_intent: Option<String>,

    pub metadata: Metadata,
}

impl SessionDetails {
    pub fn is_complete(&self) -> bool {
        self.status.as_deref() == Some("complete")
    }

    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Summary of a provider price
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceInfo {
    pub id: String,
    pub active: bool,

    /// Amount in the smallest currency unit
    pub unit_amount: Option<i64>,

    pub currency: Option<String>,

    /// `month`, `year`, ... for recurring prices
    pub recurring_interval: Option<String>,
}

/// Payment provider operations used by the checkout flows
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Look up a price; fails if it does not exist
    async fn retrieve_price(&self, price_id: &str) -> Result<PriceInfo>;

    /// Create a hosted checkout session
    async fn create_session(&self, params: SessionParams) -> Result<CreatedSession>;

    /// Read a checkout session back
    async fn retrieve_session(&self, session_id: &str) -> Result<SessionDetails>;

    /// Gateway name for logs and health output
    fn name(&self) -> &str;
}
