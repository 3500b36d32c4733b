//! Server Configuration
//!
//! Read once at startup from the environment (a `.env` file is loaded
//! first by `main`).

use std::collections::HashMap;

use evtaxi_core::{PlanId, PlanPrices, PricedPlan};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    InvalidEnvVar { name: &'static str, reason: String },
}

/// Where checkout calls go
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentsMode {
    Stripe { secret_key: String },
    /// In-memory gateway, no real charges
    Mock,
}

/// Where dashboard data lives
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreMode {
    Supabase { url: String, service_key: String },
    Memory,
    /// Dashboard endpoints answer 503
    Disabled,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub static_dir: String,
    pub site_url: String,
    pub payments: PaymentsMode,
    pub store: StoreMode,
    pub prices: HashMap<PlanId, PlanPrices>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let site_url = var("SITE_URL").ok_or(ConfigError::MissingEnvVar("SITE_URL"))?;
        let site_url = site_url.trim().trim_end_matches('/').to_string();
        if !(site_url.starts_with("http://") || site_url.starts_with("https://")) {
            return Err(ConfigError::InvalidEnvVar {
                name: "SITE_URL",
                reason: format!("expected an http(s) URL, got {site_url:?}"),
            });
        }

        let payments = match var("PAYMENTS_MODE").as_deref() {
            Some("mock") => PaymentsMode::Mock,
            None | Some("stripe") => PaymentsMode::Stripe {
                secret_key: var("STRIPE_SECRET_KEY")
                    .ok_or(ConfigError::MissingEnvVar("STRIPE_SECRET_KEY"))?,
            },
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar {
                    name: "PAYMENTS_MODE",
                    reason: format!("expected `stripe` or `mock`, got {other:?}"),
                });
            }
        };

        let store = match var("STORE_MODE").as_deref() {
            Some("memory") => StoreMode::Memory,
            None | Some("supabase") => match (var("SUPABASE_URL"), var("SUPABASE_SERVICE_KEY")) {
                (Some(url), Some(service_key)) => StoreMode::Supabase { url, service_key },
                _ => StoreMode::Disabled,
            },
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar {
                    name: "STORE_MODE",
                    reason: format!("expected `supabase` or `memory`, got {other:?}"),
                });
            }
        };

        let prices = PlanId::ALL
            .iter()
            .map(|&id| {
                let suffix = id.env_suffix();
                let prices = PlanPrices {
                    price_id: var(&format!("STRIPE_PRICE_{suffix}")),
                    setup_price_id: var(&format!("STRIPE_SETUP_PRICE_{suffix}")),
                };
                (id, prices)
            })
            .collect();

        Ok(Self {
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
            static_dir: var("STATIC_DIR").unwrap_or_else(|| "static".into()),
            site_url,
            payments,
            store,
            prices,
        })
    }

    /// Plan catalog with the configured price ids filled in
    pub fn priced_plans(&self) -> Vec<PricedPlan> {
        PlanId::ALL
            .iter()
            .map(|id| PricedPlan {
                plan: id.plan(),
                prices: self.prices.get(id).cloned().unwrap_or_default(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_minimal_config() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("SITE_URL", "https://evtaxi.app/"),
            ("STRIPE_SECRET_KEY", "sk_test_123"),
        ]))
        .unwrap();

        assert_eq!(config.site_url, "https://evtaxi.app");
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.static_dir, "static");
        assert_eq!(config.store, StoreMode::Disabled);
        assert!(matches!(config.payments, PaymentsMode::Stripe { .. }));
    }

    #[test]
    fn test_required_variables() {
        let err = ServerConfig::from_lookup(lookup(&[("STRIPE_SECRET_KEY", "sk_test_123")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingEnvVar("SITE_URL"));

        let err = ServerConfig::from_lookup(lookup(&[
            ("SITE_URL", "https://evtaxi.app"),
            ("STRIPE_SECRET_KEY", "  "),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingEnvVar("STRIPE_SECRET_KEY"));
    }

    #[test]
    fn test_site_url_must_be_http() {
        let err = ServerConfig::from_lookup(lookup(&[
            ("SITE_URL", "evtaxi.app"),
            ("PAYMENTS_MODE", "mock"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { name: "SITE_URL", .. }));
    }

    #[test]
    fn test_modes_and_prices() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("SITE_URL", "http://localhost:3000"),
            ("PAYMENTS_MODE", "mock"),
            ("STORE_MODE", "memory"),
            ("STRIPE_PRICE_PROFESSIONAL", "price_pro_monthly"),
            ("STRIPE_SETUP_PRICE_PROFESSIONAL", "price_pro_setup"),
        ]))
        .unwrap();

        assert_eq!(config.payments, PaymentsMode::Mock);
        assert_eq!(config.store, StoreMode::Memory);

        let plans = config.priced_plans();
        assert_eq!(plans.len(), 3);
        assert!(!plans[0].prices.is_purchasable());
        assert_eq!(plans[1].prices.price_id.as_deref(), Some("price_pro_monthly"));
        assert!(plans[1].prices.is_purchasable());
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let err = ServerConfig::from_lookup(lookup(&[
            ("SITE_URL", "https://evtaxi.app"),
            ("PAYMENTS_MODE", "paypal"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { name: "PAYMENTS_MODE", .. }));
    }
}
