//! Application State

use std::sync::Arc;

use evtaxi_core::PricedPlan;
use evtaxi_payments::CheckoutService;
use evtaxi_store::DashboardStore;

use crate::error::ApiError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Checkout flows over the configured payment gateway
    pub checkout: Arc<CheckoutService>,

    /// Dashboard data (None if not configured)
    pub store: Option<Arc<dyn DashboardStore>>,

    /// Plan catalog with configured price ids
    pub plans: Arc<Vec<PricedPlan>>,
}

impl AppState {
    /// The dashboard store, or 503 when none is configured
    pub fn store(&self) -> Result<&dyn DashboardStore, ApiError> {
        self.store.as_deref().ok_or(ApiError::StoreUnavailable)
    }
}
