//! Mock Payment Gateway
//!
//! In-memory gateway for tests and local development. Knows a fixed set of
//! prices, records every session it creates and can be told to fail.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::error::{PaymentError, Result};
use crate::gateway::{CreatedSession, PaymentGateway, PriceInfo, SessionDetails, SessionParams};

/// Failure the mock should produce on its next calls
#[derive(Clone, Debug)]
enum Failure {
    Provider { message: String, kind: String },
    Transport(String),
}

#[derive(Default)]
struct MockState {
    prices: HashSet<String>,
    sessions: HashMap<String, SessionDetails>,
    created: Vec<SessionParams>,
    failure: Option<Failure>,
}

/// Mock gateway with configurable prices and failures
#[derive(Default)]
pub struct MockGateway {
    state: Mutex<MockState>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register prices that `retrieve_price` should find
    pub fn with_prices<I, S>(self, prices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock().prices.extend(prices.into_iter().map(Into::into));
        self
    }

    /// Make every subsequent call fail with a Stripe-reported error
    pub fn fail_with_provider_error(&self, message: impl Into<String>, kind: impl Into<String>) {
        self.lock().failure = Some(Failure::Provider {
            message: message.into(),
            kind: kind.into(),
        });
    }

    /// Make every subsequent call fail as if the network dropped
    pub fn fail_with_transport_error(&self, message: impl Into<String>) {
        self.lock().failure = Some(Failure::Transport(message.into()));
    }

    /// Seed a session, e.g. a setup session created in an earlier request
    pub fn insert_session(&self, session: SessionDetails) {
        self.lock().sessions.insert(session.id.clone(), session);
    }

    /// Simulate the customer finishing the hosted checkout
    pub fn complete_session(&self, session_id: &str, customer: impl Into<String>) -> bool {
        let mut state = self.lock();
        let Some(session) = state.sessions.get_mut(session_id) else {
            return false;
        };
        session.status = Some("complete".into());
        session.payment_status = Some("paid".into());
        session.customer = Some(customer.into());
        true
    }

    /// Parameters of every session created so far
    pub fn created_sessions(&self) -> Vec<SessionParams> {
        self.lock().created.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_failure(state: &MockState) -> Result<()> {
        match &state.failure {
            Some(Failure::Provider { message, kind }) => Err(PaymentError::Provider {
                message: message.clone(),
                kind: kind.clone(),
            }),
            Some(Failure::Transport(message)) => Err(PaymentError::Transport(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn retrieve_price(&self, price_id: &str) -> Result<PriceInfo> {
        let state = self.lock();
        Self::check_failure(&state)?;

        if !state.prices.contains(price_id) {
            return Err(PaymentError::InvalidPrice(format!("{price_id}: No such price")));
        }

        Ok(PriceInfo {
            id: price_id.to_string(),
            active: true,
            unit_amount: None,
            currency: Some("usd".into()),
            recurring_interval: None,
        })
    }

    async fn create_session(&self, params: SessionParams) -> Result<CreatedSession> {
        let mut state = self.lock();
        Self::check_failure(&state)?;

        let id = format!("cs_test_{}", uuid::Uuid::new_v4().simple());
        let details = SessionDetails {
            id: id.clone(),
            status: Some("open".into()),
            payment_status: Some("unpaid".into()),
            customer: params.customer.clone(),
            subscription: None,
            setup_intent: None,
            payment_intent: None,
            metadata: params.metadata.clone(),
        };

        state.sessions.insert(id.clone(), details);
        state.created.push(params);

        Ok(CreatedSession {
            url: Some(format!("https://checkout.stripe.com/c/pay/{id}")),
            id,
        })
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<SessionDetails> {
        let state = self.lock();
        Self::check_failure(&state)?;

        state.sessions.get(session_id).cloned().ok_or_else(|| PaymentError::Provider {
            message: format!("No such checkout.session: '{session_id}'"),
            kind: "invalid_request_error".into(),
        })
    }

    fn name(&self) -> &str {
        "Mock"
    }
}
