//! Stripe Gateway
//!
//! [`PaymentGateway`] backed by Stripe hosted Checkout.

use async_trait::async_trait;
use stripe::{
    CheckoutSession, CheckoutSessionBillingAddressCollection, CheckoutSessionCustomerCreation,
    CheckoutSessionId, CheckoutSessionLocale, CheckoutSessionMode, Client, CreateCheckoutSession,
    CreateCheckoutSessionLineItems, CreateCheckoutSessionPaymentIntentData,
    CreateCheckoutSessionPaymentMethodTypes, CreateCheckoutSessionPhoneNumberCollection,
    CreateCheckoutSessionSubscriptionData, CreateCheckoutSessionTaxIdCollection, CustomerId,
    Price, PriceId,
};

use crate::error::{PaymentError, Result};
use crate::gateway::{
    CreatedSession, PaymentGateway, PriceInfo, SessionDetails, SessionMode, SessionParams,
};

/// Stripe client wrapper
pub struct StripeClient {
    client: Client,
}

impl StripeClient {
    /// Create a new Stripe client
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| PaymentError::Config("STRIPE_SECRET_KEY not set".into()))?;

        Ok(Self::new(&secret_key))
    }

    /// Get the underlying Stripe client
    pub const fn inner(&self) -> &Client {
        &self.client
    }

    fn build_create_params(params: &SessionParams) -> Result<CreateCheckoutSession<'_>> {
        let mut create = CreateCheckoutSession::new();
        create.success_url = Some(&params.success_url);
        create.cancel_url = Some(&params.cancel_url);
        create.payment_method_types = Some(vec![CreateCheckoutSessionPaymentMethodTypes::Card]);
        create.locale = Some(CheckoutSessionLocale::Auto);

        create.line_items = Some(
            params
                .line_items
                .iter()
                .map(|item| CreateCheckoutSessionLineItems {
                    price: Some(item.price_id.clone()),
                    quantity: Some(item.quantity),
                    ..Default::default()
                })
                .collect(),
        );

        if !params.metadata.is_empty() {
            create.metadata = Some(params.metadata.clone());
        }

        if let Some(customer) = &params.customer {
            let customer_id: CustomerId = customer.parse().map_err(|_| {
                PaymentError::InvalidRequest(format!("Invalid customer ID: {customer}"))
            })?;
            create.customer = Some(customer_id);
        }

        match params.mode {
            SessionMode::Subscription => {
                create.mode = Some(CheckoutSessionMode::Subscription);
                if let Some(metadata) = &params.subscription_metadata {
                    create.subscription_data = Some(CreateCheckoutSessionSubscriptionData {
                        metadata: Some(metadata.clone()),
                        ..Default::default()
                    });
                }
            }
            SessionMode::Payment => {
                create.mode = Some(CheckoutSessionMode::Payment);
                if params.payment_description.is_some() || !params.metadata.is_empty() {
                    create.payment_intent_data = Some(CreateCheckoutSessionPaymentIntentData {
                        description: params.payment_description.clone(),
                        metadata: Some(params.metadata.clone()),
                        ..Default::default()
                    });
                }
                // Stripe only accepts customer_creation without an existing customer
                if params.always_create_customer && params.customer.is_none() {
                    create.customer_creation = Some(CheckoutSessionCustomerCreation::Always);
                }
            }
        }

        if params.require_billing_address {
            create.billing_address_collection =
                Some(CheckoutSessionBillingAddressCollection::Required);
        }
        if params.collect_phone_number {
            create.phone_number_collection =
                Some(CreateCheckoutSessionPhoneNumberCollection { enabled: true });
        }
        if params.collect_tax_id {
            create.tax_id_collection = Some(CreateCheckoutSessionTaxIdCollection { enabled: true });
        }
        if params.allow_promotion_codes {
            create.allow_promotion_codes = Some(true);
        }
        create.expires_at = params.expires_at;

        Ok(create)
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    async fn retrieve_price(&self, price_id: &str) -> Result<PriceInfo> {
        let id: PriceId = price_id
            .parse()
            .map_err(|e| PaymentError::InvalidPrice(format!("{price_id}: {e}")))?;

        let price = Price::retrieve(&self.client, &id, &[])
            .await
            .map_err(|e| match PaymentError::from(e) {
                PaymentError::Provider { message, .. } => {
                    PaymentError::InvalidPrice(format!("{price_id}: {message}"))
                }
                other => other,
            })?;

        Ok(PriceInfo {
            id: price.id.to_string(),
            active: price.active.unwrap_or(false),
            unit_amount: price.unit_amount,
            currency: price.currency.map(|c| c.to_string()),
            recurring_interval: price.recurring.map(|r| r.interval.to_string()),
        })
    }

    async fn create_session(&self, params: SessionParams) -> Result<CreatedSession> {
        let create = Self::build_create_params(&params)?;

        let session = CheckoutSession::create(&self.client, create).await?;

        tracing::debug!(session_id = %session.id, mode = ?params.mode, "Stripe checkout session created");

        Ok(CreatedSession {
            id: session.id.to_string(),
            url: session.url,
        })
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<SessionDetails> {
        let id: CheckoutSessionId = session_id.parse().map_err(|_| {
            PaymentError::InvalidRequest(format!("Invalid session ID: {session_id}"))
        })?;

        let session = CheckoutSession::retrieve(&self.client, &id, &[]).await?;

        Ok(SessionDetails {
            id: session.id.to_string(),
            status: session.status.map(|s| s.to_string()),
            payment_status: Some(session.payment_status.to_string()),
            customer: session.customer.map(|c| c.id().to_string()),
            subscription: session.subscription.map(|s| s.id().to_string()),
            setup_intent: session.setup_intent.map(|s| s.id().to_string()),
            payment_intent: session.payment_intent.map(|p| p.id().to_string()),
            metadata: session.metadata.unwrap_or_default(),
        })
    }

    fn name(&self) -> &str {
        "Stripe"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{LineItem, Metadata};

    fn params(mode: SessionMode) -> SessionParams {
        let mut params = SessionParams::new(
            mode,
            vec![LineItem::single("price_monthly"), LineItem::single("price_setup")],
            "https://evtaxi.app/success?session_id={CHECKOUT_SESSION_ID}",
            "https://evtaxi.app/#pricing",
        );
        params.metadata = Metadata::from([("planName".to_string(), "Starter".to_string())]);
        params.subscription_metadata = Some(params.metadata.clone());
        params.payment_description = Some("Starter Plan - Setup fee".into());
        params.require_billing_address = true;
        params.always_create_customer = true;
        params
    }

    #[test]
    fn test_subscription_params() {
        let session = params(SessionMode::Subscription);
        let create = StripeClient::build_create_params(&session).unwrap();

        assert_eq!(create.mode, Some(CheckoutSessionMode::Subscription));
        assert_eq!(create.line_items.as_ref().map(Vec::len), Some(2));
        assert!(create.subscription_data.is_some());
        assert!(create.payment_intent_data.is_none());
        assert!(create.customer_creation.is_none());
        assert_eq!(
            create.billing_address_collection,
            Some(CheckoutSessionBillingAddressCollection::Required)
        );
    }

    #[test]
    fn test_payment_params() {
        let session = params(SessionMode::Payment);
        let create = StripeClient::build_create_params(&session).unwrap();

        assert_eq!(create.mode, Some(CheckoutSessionMode::Payment));
        assert!(create.subscription_data.is_none());
        assert!(create.payment_intent_data.is_some());
        assert_eq!(create.customer_creation, Some(CheckoutSessionCustomerCreation::Always));
    }

    #[test]
    fn test_rejects_malformed_customer() {
        let mut session = params(SessionMode::Subscription);
        session.customer = Some("not-a-customer".into());
        assert!(matches!(
            StripeClient::build_create_params(&session),
            Err(PaymentError::InvalidRequest(_))
        ));
    }
}
