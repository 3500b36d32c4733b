//! Checkout Flows
//!
//! Implements the "Stripe Checkout (Hosted)" purchase flows for the
//! booking-kit plans. Every plan is a setup fee plus a monthly subscription,
//! sold one of three ways:
//!
//! - single price: the subscription price only
//! - same call: one subscription session carrying both prices
//! - split: a payment session for the setup fee, then a subscription
//!   session for the same customer once the customer comes back
//!
//! ```text
//! ┌─────────────┐  setup session  ┌─────────────────┐  /subscribe   ┌──────────────────┐
//! │   pricing   │────────────────▶│  Stripe Hosted  │──────────────▶│ subscription     │
//! │    page     │                 │  (setup fee)    │               │ session (Stripe) │
//! └─────────────┘                 └─────────────────┘               └──────────────────┘
//! ```
//!
//! State between the two split steps travels in session metadata only.

use std::sync::Arc;

use chrono::{Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{PaymentError, Result};
use crate::gateway::{
    LineItem, Metadata, PaymentGateway, SESSION_ID_PLACEHOLDER, SessionMode, SessionParams,
};

/// Metadata `source` value for sessions started from the website
pub const CHECKOUT_SOURCE: &str = "website_checkout";

/// How long a created session stays payable
pub const SESSION_TTL_MINUTES: i64 = 30;

/// Redirect targets derived from the public site URL
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckoutUrls {
    site_url: String,
}

impl CheckoutUrls {
    pub fn new(site_url: impl Into<String>) -> Self {
        let site_url: String = site_url.into();
        Self {
            site_url: site_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    /// Where Stripe sends the customer after paying
    pub fn success_url(&self) -> String {
        format!("{}/success?session_id={SESSION_ID_PLACEHOLDER}", self.site_url)
    }

    /// Where Stripe sends the customer after backing out
    pub fn cancel_url(&self) -> String {
        format!("{}/#pricing", self.site_url)
    }

    /// Where the split flow resumes after the setup fee is paid
    pub fn subscribe_url(&self) -> String {
        format!("{}/subscribe?setup_session_id={SESSION_ID_PLACEHOLDER}", self.site_url)
    }
}

/// Body of `create-checkout-session`.
///
/// Carries either `priceId` alone or `subscriptionPriceId` + `setupPriceId`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutRequest {
    #[serde(default)]
    pub price_id: Option<String>,

    #[serde(default)]
    pub subscription_price_id: Option<String>,

    #[serde(default)]
    pub setup_price_id: Option<String>,

    #[serde(default)]
    pub plan_name: Option<String>,
}

impl CreateCheckoutRequest {
    /// Whether the caller asked for the two-price setup + subscription checkout.
    /// Blank ids count as absent.
    pub fn wants_setup_fee(&self) -> bool {
        present(self.subscription_price_id.as_ref()).is_some()
            || present(self.setup_price_id.as_ref()).is_some()
    }
}

/// Body of `create-setup-session`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupSessionRequest {
    #[serde(default)]
    pub subscription_price_id: Option<String>,

    #[serde(default)]
    pub setup_price_id: Option<String>,

    #[serde(default)]
    pub plan_name: Option<String>,
}

/// Body of `create-subscription`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscriptionRequest {
    #[serde(default)]
    pub setup_session_id: Option<String>,
}

/// Body of `verify-session`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifySessionRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Result of creating a checkout session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    /// Stripe session ID
    pub session_id: String,

    /// URL to redirect user to
    pub url: Option<String>,
}

/// Result of verifying a session after the customer returns
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedSession {
    pub success: bool,
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub customer: Option<String>,
    pub subscription: Option<String>,
    pub setup_intent: Option<String>,
    pub payment_intent: Option<String>,
    pub plan_name: Option<String>,
}

/// Trimmed, non-empty value of an optional request field
fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Checkout orchestration over a [`PaymentGateway`]
#[derive(Clone)]
pub struct CheckoutService {
    gateway: Arc<dyn PaymentGateway>,
    urls: CheckoutUrls,
}

impl CheckoutService {
    pub fn new(gateway: Arc<dyn PaymentGateway>, urls: CheckoutUrls) -> Self {
        Self { gateway, urls }
    }

    pub fn gateway(&self) -> &dyn PaymentGateway {
        self.gateway.as_ref()
    }

    pub const fn urls(&self) -> &CheckoutUrls {
        &self.urls
    }

    /// Dispatch on the request shape: setup + subscription when either of
    /// the two-price fields is present, single price otherwise.
    pub async fn create_checkout(&self, request: &CreateCheckoutRequest) -> Result<CheckoutSession> {
        if request.wants_setup_fee() {
            self.create_setup_checkout(
                request.subscription_price_id.as_ref(),
                request.setup_price_id.as_ref(),
                request.plan_name.as_ref(),
            )
            .await
        } else {
            self.create_subscription_checkout(request.price_id.as_ref(), request.plan_name.as_ref())
                .await
        }
    }

    /// Subscription checkout for a single recurring price
    pub async fn create_subscription_checkout(
        &self,
        price_id: Option<&String>,
        plan_name: Option<&String>,
    ) -> Result<CheckoutSession> {
        let (Some(price), Some(plan)) = (present(price_id), present(plan_name)) else {
            return Err(PaymentError::missing_fields(json!({
                "priceId": price_id,
                "planName": plan_name,
            })));
        };

        self.verify_price(price).await?;
        tracing::debug!(price_id = %price, "Price verified");

        let metadata = base_metadata(plan, [("priceId", price)]);

        let mut params = self.subscription_params(vec![LineItem::single(price)], metadata);
        params.collect_phone_number = true;
        params.collect_tax_id = true;

        let session = self.gateway.create_session(params).await?;
        tracing::info!(session_id = %session.id, plan = %plan, "Created checkout session");

        Ok(CheckoutSession {
            session_id: session.id,
            url: session.url,
        })
    }

    /// Subscription checkout that bills the setup fee on the first invoice
    pub async fn create_setup_checkout(
        &self,
        subscription_price_id: Option<&String>,
        setup_price_id: Option<&String>,
        plan_name: Option<&String>,
    ) -> Result<CheckoutSession> {
        let (subscription, setup, plan) =
            require_setup_fields(subscription_price_id, setup_price_id, plan_name)?;

        self.verify_prices(subscription, setup).await?;

        let metadata = base_metadata(
            plan,
            [("subscriptionPriceId", subscription), ("setupPriceId", setup)],
        );

        let params = self.subscription_params(
            vec![LineItem::single(subscription), LineItem::single(setup)],
            metadata,
        );

        let session = self.gateway.create_session(params).await?;
        tracing::info!(session_id = %session.id, plan = %plan, "Created setup + subscription checkout session");

        Ok(CheckoutSession {
            session_id: session.id,
            url: session.url,
        })
    }

    /// Split flow, step 1: collect the setup fee on its own
    pub async fn create_setup_session(&self, request: &SetupSessionRequest) -> Result<CheckoutSession> {
        let (subscription, setup, plan) = require_setup_fields(
            request.subscription_price_id.as_ref(),
            request.setup_price_id.as_ref(),
            request.plan_name.as_ref(),
        )?;

        self.verify_prices(subscription, setup).await?;

        let mut metadata = base_metadata(
            plan,
            [("subscriptionPriceId", subscription), ("setupPriceId", setup)],
        );
        metadata.insert("type".into(), "setup".into());

        let mut params = SessionParams::new(
            SessionMode::Payment,
            vec![LineItem::single(setup)],
            self.urls.subscribe_url(),
            self.urls.cancel_url(),
        );
        params.metadata = metadata;
        params.payment_description = Some(format!("{plan} Plan - Setup fee"));
        params.require_billing_address = true;
        params.allow_promotion_codes = true;
        params.always_create_customer = true;
        params.expires_at = Some(expiry());

        let session = self.gateway.create_session(params).await?;
        tracing::info!(session_id = %session.id, plan = %plan, "Created setup fee session");

        Ok(CheckoutSession {
            session_id: session.id,
            url: session.url,
        })
    }

    /// Split flow, step 2: start the subscription for the customer who paid
    /// the setup fee
    pub async fn create_subscription_from_setup(
        &self,
        request: &CreateSubscriptionRequest,
    ) -> Result<CheckoutSession> {
        let Some(setup_session_id) = present(request.setup_session_id.as_ref()) else {
            return Err(PaymentError::missing_fields(json!({
                "setupSessionId": request.setup_session_id,
            })));
        };

        let setup = self.gateway.retrieve_session(setup_session_id).await?;

        let subscription_price = setup
            .metadata_value("subscriptionPriceId")
            .ok_or(PaymentError::MissingSetupMetadata)?
            .to_string();

        if !setup.is_complete() {
            return Err(PaymentError::SetupIncomplete(setup_session_id.to_string()));
        }

        let plan = setup.metadata_value("planName").unwrap_or_default().to_string();
        let metadata = Metadata::from([
            ("planName".to_string(), plan.clone()),
            ("type".to_string(), "subscription".to_string()),
            ("setupSessionId".to_string(), setup_session_id.to_string()),
        ]);

        let mut params = SessionParams::new(
            SessionMode::Subscription,
            vec![LineItem::single(subscription_price)],
            self.urls.success_url(),
            self.urls.cancel_url(),
        );
        params.customer = setup.customer.clone();
        params.subscription_metadata = Some(metadata.clone());
        params.metadata = metadata;

        let session = self.gateway.create_session(params).await?;
        tracing::info!(
            session_id = %session.id,
            setup_session_id = %setup_session_id,
            customer = ?setup.customer,
            plan = %plan,
            "Created subscription session from setup"
        );

        Ok(CheckoutSession {
            session_id: session.id,
            url: session.url,
        })
    }

    /// Read a session back after the customer returns to the success page
    pub async fn verify_session(&self, request: &VerifySessionRequest) -> Result<VerifiedSession> {
        let Some(session_id) = present(request.session_id.as_ref()) else {
            return Err(PaymentError::missing_fields(json!({
                "sessionId": request.session_id,
            })));
        };

        let session = self.gateway.retrieve_session(session_id).await?;
        tracing::info!(session_id = %session_id, status = ?session.status, "Verified checkout session");

        Ok(VerifiedSession {
            success: true,
            plan_name: session.metadata_value("planName").map(String::from),
            status: session.status,
            payment_status: session.payment_status,
            customer: session.customer,
            subscription: session.subscription,
            setup_intent: session.setup_intent,
            payment_intent: session.payment_intent,
        })
    }

    fn subscription_params(&self, line_items: Vec<LineItem>, metadata: Metadata) -> SessionParams {
        let mut params = SessionParams::new(
            SessionMode::Subscription,
            line_items,
            self.urls.success_url(),
            self.urls.cancel_url(),
        );
        params.subscription_metadata = Some(metadata.clone());
        params.metadata = metadata;
        params.require_billing_address = true;
        params.allow_promotion_codes = true;
        params.expires_at = Some(expiry());
        params
    }

    async fn verify_price(&self, price_id: &str) -> Result<()> {
        self.gateway
            .retrieve_price(price_id)
            .await
            .map(|_| ())
            .map_err(|e| match e {
                PaymentError::Provider { message, .. } => {
                    PaymentError::InvalidPrice(format!("{price_id}: {message}"))
                }
                other => {
                    tracing::warn!(price_id = %price_id, error = %other, "Price verification failed");
                    other
                }
            })
    }

    async fn verify_prices(&self, subscription: &str, setup: &str) -> Result<()> {
        tokio::try_join!(self.verify_price(subscription), self.verify_price(setup))?;
        Ok(())
    }
}

fn require_setup_fields<'a>(
    subscription_price_id: Option<&'a String>,
    setup_price_id: Option<&'a String>,
    plan_name: Option<&'a String>,
) -> Result<(&'a str, &'a str, &'a str)> {
    match (
        present(subscription_price_id),
        present(setup_price_id),
        present(plan_name),
    ) {
        (Some(subscription), Some(setup), Some(plan)) => Ok((subscription, setup, plan)),
        _ => {
            tracing::warn!(
                subscription_price_id = ?subscription_price_id,
                setup_price_id = ?setup_price_id,
                plan_name = ?plan_name,
                "Missing checkout fields"
            );
            Err(PaymentError::missing_fields(json!({
                "subscriptionPriceId": subscription_price_id,
                "setupPriceId": setup_price_id,
                "planName": plan_name,
            })))
        }
    }
}

/// `planName`, `source`, `timestamp` plus flow-specific entries
fn base_metadata<const N: usize>(plan: &str, extra: [(&str, &str); N]) -> Metadata {
    let mut metadata = Metadata::from([
        ("planName".to_string(), plan.to_string()),
        ("source".to_string(), CHECKOUT_SOURCE.to_string()),
        (
            "timestamp".to_string(),
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        ),
    ]);
    metadata.extend(extra.into_iter().map(|(k, v)| (k.to_string(), v.to_string())));
    metadata
}

fn expiry() -> i64 {
    (Utc::now() + Duration::minutes(SESSION_TTL_MINUTES)).timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::SessionDetails;
    use crate::mock::MockGateway;

    const SITE: &str = "https://evtaxi.app/";

    fn service(gateway: &Arc<MockGateway>) -> CheckoutService {
        CheckoutService::new(gateway.clone(), CheckoutUrls::new(SITE))
    }

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_redirect_urls() {
        let urls = CheckoutUrls::new(SITE);
        assert_eq!(
            urls.success_url(),
            "https://evtaxi.app/success?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(urls.cancel_url(), "https://evtaxi.app/#pricing");
        assert_eq!(
            urls.subscribe_url(),
            "https://evtaxi.app/subscribe?setup_session_id={CHECKOUT_SESSION_ID}"
        );
    }

    #[tokio::test]
    async fn test_single_price_checkout() {
        let gateway = Arc::new(MockGateway::new().with_prices(["price_monthly"]));
        let request = CreateCheckoutRequest {
            price_id: some("price_monthly"),
            plan_name: some("Starter"),
            ..Default::default()
        };

        let session = service(&gateway).create_checkout(&request).await.unwrap();
        assert!(session.session_id.starts_with("cs_test_"));
        assert!(session.url.is_some());

        let created = gateway.created_sessions();
        assert_eq!(created.len(), 1);
        let params = &created[0];
        assert_eq!(params.mode, SessionMode::Subscription);
        assert_eq!(params.line_items, vec![LineItem::single("price_monthly")]);
        assert_eq!(params.metadata["planName"], "Starter");
        assert_eq!(params.metadata["priceId"], "price_monthly");
        assert_eq!(params.metadata["source"], CHECKOUT_SOURCE);
        assert!(params.metadata.contains_key("timestamp"));
        assert_eq!(params.subscription_metadata.as_ref(), Some(&params.metadata));
        assert!(params.require_billing_address);
        assert!(params.allow_promotion_codes);
        assert!(params.collect_phone_number);
        assert!(params.expires_at.is_some());
    }

    #[tokio::test]
    async fn test_blank_setup_price_keeps_single_price_checkout() {
        let gateway = Arc::new(MockGateway::new().with_prices(["price_monthly"]));
        let request = CreateCheckoutRequest {
            price_id: some("price_monthly"),
            setup_price_id: some(""),
            subscription_price_id: some("  "),
            plan_name: some("Starter"),
        };
        assert!(!request.wants_setup_fee());

        service(&gateway).create_checkout(&request).await.unwrap();

        let created = gateway.created_sessions();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].line_items, vec![LineItem::single("price_monthly")]);
        assert!(!created[0].metadata.contains_key("setupPriceId"));
    }

    #[tokio::test]
    async fn test_missing_fields_echo_received_values() {
        let gateway = Arc::new(MockGateway::new());
        let request = CreateCheckoutRequest {
            price_id: some("price_monthly"),
            plan_name: some("   "),
            ..Default::default()
        };

        let err = service(&gateway).create_checkout(&request).await.unwrap_err();
        let PaymentError::MissingFields { details, .. } = err else {
            panic!("expected missing fields, got {err:?}");
        };
        assert_eq!(details["priceId"], "price_monthly");
        assert!(gateway.created_sessions().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_price_is_rejected() {
        let gateway = Arc::new(MockGateway::new().with_prices(["price_monthly"]));
        let request = CreateCheckoutRequest {
            subscription_price_id: some("price_monthly"),
            setup_price_id: some("price_missing"),
            plan_name: some("Professional"),
            ..Default::default()
        };

        let err = service(&gateway).create_checkout(&request).await.unwrap_err();
        assert!(matches!(err, PaymentError::InvalidPrice(_)));
        assert!(gateway.created_sessions().is_empty());
    }

    #[tokio::test]
    async fn test_setup_checkout_has_both_prices() {
        let gateway = Arc::new(MockGateway::new().with_prices(["price_monthly", "price_setup"]));
        let request = CreateCheckoutRequest {
            subscription_price_id: some("price_monthly"),
            setup_price_id: some("price_setup"),
            plan_name: some("Professional"),
            ..Default::default()
        };

        service(&gateway).create_checkout(&request).await.unwrap();

        let params = &gateway.created_sessions()[0];
        assert_eq!(params.mode, SessionMode::Subscription);
        assert_eq!(
            params.line_items,
            vec![LineItem::single("price_monthly"), LineItem::single("price_setup")]
        );
        assert_eq!(params.metadata["subscriptionPriceId"], "price_monthly");
        assert_eq!(params.metadata["setupPriceId"], "price_setup");
    }

    #[tokio::test]
    async fn test_split_flow() {
        let gateway = Arc::new(MockGateway::new().with_prices(["price_monthly", "price_setup"]));
        let service = service(&gateway);

        let setup = service
            .create_setup_session(&SetupSessionRequest {
                subscription_price_id: some("price_monthly"),
                setup_price_id: some("price_setup"),
                plan_name: some("Custom App"),
            })
            .await
            .unwrap();

        let setup_params = &gateway.created_sessions()[0];
        assert_eq!(setup_params.mode, SessionMode::Payment);
        assert_eq!(setup_params.line_items, vec![LineItem::single("price_setup")]);
        assert_eq!(setup_params.metadata["type"], "setup");
        assert!(setup_params.always_create_customer);
        assert!(setup_params.success_url.contains("/subscribe?setup_session_id="));

        let request = CreateSubscriptionRequest {
            setup_session_id: Some(setup.session_id.clone()),
        };

        // Not paid yet
        let err = service.create_subscription_from_setup(&request).await.unwrap_err();
        assert!(matches!(err, PaymentError::SetupIncomplete(_)));

        assert!(gateway.complete_session(&setup.session_id, "cus_42"));
        service.create_subscription_from_setup(&request).await.unwrap();

        let created = gateway.created_sessions();
        let params = &created[1];
        assert_eq!(params.mode, SessionMode::Subscription);
        assert_eq!(params.customer.as_deref(), Some("cus_42"));
        assert_eq!(params.line_items, vec![LineItem::single("price_monthly")]);
        assert_eq!(params.metadata["planName"], "Custom App");
        assert_eq!(params.metadata["type"], "subscription");
        assert_eq!(params.metadata["setupSessionId"], setup.session_id);
    }

    #[tokio::test]
    async fn test_setup_session_without_metadata() {
        let gateway = Arc::new(MockGateway::new());
        gateway.insert_session(SessionDetails {
            id: "cs_test_plain".into(),
            status: Some("complete".into()),
            ..Default::default()
        });

        let err = service(&gateway)
            .create_subscription_from_setup(&CreateSubscriptionRequest {
                setup_session_id: some("cs_test_plain"),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::MissingSetupMetadata));
    }

    #[tokio::test]
    async fn test_verify_session() {
        let gateway = Arc::new(MockGateway::new());
        gateway.insert_session(SessionDetails {
            id: "cs_test_done".into(),
            status: Some("complete".into()),
            payment_status: Some("paid".into()),
            customer: some("cus_1"),
            subscription: some("sub_1"),
            metadata: Metadata::from([("planName".to_string(), "Starter".to_string())]),
            ..Default::default()
        });

        let verified = service(&gateway)
            .verify_session(&VerifySessionRequest {
                session_id: some("cs_test_done"),
            })
            .await
            .unwrap();

        assert!(verified.success);
        assert_eq!(verified.status.as_deref(), Some("complete"));
        assert_eq!(verified.subscription.as_deref(), Some("sub_1"));
        assert_eq!(verified.plan_name.as_deref(), Some("Starter"));
    }

    #[tokio::test]
    async fn test_provider_error_passes_through() {
        let gateway = Arc::new(MockGateway::new());
        gateway.fail_with_provider_error("No such checkout.session", "invalid_request_error");

        let err = service(&gateway)
            .verify_session(&VerifySessionRequest {
                session_id: some("cs_test_gone"),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::Provider { .. }));
    }
}
