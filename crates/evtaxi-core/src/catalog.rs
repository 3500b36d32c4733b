//! Plan Catalog
//!
//! The three booking-kit plans sold on the pricing page. Every plan is a
//! one-time setup fee followed by a monthly subscription.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Plan identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanId {
    Starter,
    Professional,
    CustomApp,
}

impl PlanId {
    /// All plans in display order
    pub const ALL: [Self; 3] = [Self::Starter, Self::Professional, Self::CustomApp];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Starter => "starter",
            Self::Professional => "professional",
            Self::CustomApp => "custom-app",
        }
    }

    /// Parse a plan id or display name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "starter" => Some(Self::Starter),
            "professional" => Some(Self::Professional),
            "custom-app" => Some(Self::CustomApp),
            _ => None,
        }
    }

    /// Upper-case suffix used by the price environment variables
    pub const fn env_suffix(self) -> &'static str {
        match self {
            Self::Starter => "STARTER",
            Self::Professional => "PROFESSIONAL",
            Self::CustomApp => "CUSTOM_APP",
        }
    }

    pub fn plan(self) -> Plan {
        match self {
            Self::Starter => Plan {
                id: self,
                name: "Starter".into(),
                setup_fee: dec!(499),
                monthly_fee: dec!(29.99),
                popular: false,
                features: strings(&[
                    "EV Taxi Branded Booking App",
                    "2 Vinyl QR Code Signs",
                    "2 Vinyl EV Taxi Signs",
                    "2 NFC Cards",
                    "Basic Support",
                    "Schedule & Request Now App",
                ]),
            },
            Self::Professional => Plan {
                id: self,
                name: "Professional".into(),
                setup_fee: dec!(799),
                monthly_fee: dec!(49.99),
                popular: true,
                features: strings(&[
                    "Everything in Starter, plus:",
                    "2 Magnetic QR Code Signs",
                    "2 Magnetic EV Taxi Signs",
                    "4 NFC Cards",
                    "Priority Support",
                    "Advanced Analytics",
                    "Multi-Vehicle Support",
                    "Customer Management",
                    "In App Payment Processing",
                    "Branded Booking App",
                ]),
            },
            Self::CustomApp => Plan {
                id: self,
                name: "Custom App".into(),
                setup_fee: dec!(1499),
                monthly_fee: dec!(99),
                popular: false,
                features: strings(&[
                    "Make it truly yours. We will make a customized app just for your business:",
                    "Your Own Custom Web URL",
                    "2 Custom Magnetic QR Code Signs",
                    "2 Custom Logo Signs",
                    "8 Custom NFC Cards",
                    "24/7 VIP Support",
                    "Custom Branding App",
                    "Multi-Vehicle Support",
                    "Customized Driver App & Features",
                    "Business Consulting",
                    "Custom Integration Options",
                ]),
            },
        }
    }
}

impl std::fmt::Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `$499`, `$29.99`, `$99`
pub fn format_usd(amount: Decimal) -> String {
    if amount.fract().is_zero() {
        format!("${}", amount.trunc())
    } else {
        format!("${amount:.2}")
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// A plan as shown on the pricing page
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: PlanId,

    /// Display name, also sent to checkout as `planName`
    pub name: String,

    /// One-time setup fee in USD
    pub setup_fee: Decimal,

    /// Recurring monthly fee in USD
    pub monthly_fee: Decimal,

    /// Highlighted as "Most Popular"
    #[serde(default)]
    pub popular: bool,

    pub features: Vec<String>,
}

impl Plan {
    /// All plans in display order
    pub fn all() -> Vec<Self> {
        PlanId::ALL.iter().map(|id| id.plan()).collect()
    }

    /// Amount charged on the first invoice (setup + first month)
    pub fn first_payment(&self) -> Decimal {
        self.setup_fee + self.monthly_fee
    }
}

/// Stripe price identifiers configured for a plan
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPrices {
    /// Recurring monthly price
    pub price_id: Option<String>,

    /// One-time setup fee price
    pub setup_price_id: Option<String>,
}

impl PlanPrices {
    /// Whether both prices are configured and the plan can be bought
    pub const fn is_purchasable(&self) -> bool {
        self.price_id.is_some() && self.setup_price_id.is_some()
    }
}

/// Plan plus its configured prices, as served by `/api/plans`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedPlan {
    #[serde(flatten)]
    pub plan: Plan,

    #[serde(flatten)]
    pub prices: PlanPrices,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_fees() {
        let plan = PlanId::Professional.plan();
        assert_eq!(plan.setup_fee, dec!(799));
        assert_eq!(plan.monthly_fee, dec!(49.99));
        assert_eq!(plan.first_payment(), dec!(848.99));
        assert!(plan.popular);
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(dec!(499)), "$499");
        assert_eq!(format_usd(dec!(29.99)), "$29.99");
        assert_eq!(format_usd(dec!(99.00)), "$99");
        assert_eq!(format_usd(dec!(12.5)), "$12.50");
    }

    #[test]
    fn test_display_order() {
        let names: Vec<_> = Plan::all().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["Starter", "Professional", "Custom App"]);
    }

    #[test]
    fn test_parse_accepts_names_and_ids() {
        assert_eq!(PlanId::parse("custom-app"), Some(PlanId::CustomApp));
        assert_eq!(PlanId::parse("Custom App"), Some(PlanId::CustomApp));
        assert_eq!(PlanId::parse("STARTER"), Some(PlanId::Starter));
        assert_eq!(PlanId::parse("enterprise"), None);
    }

    #[test]
    fn test_priced_plan_serializes_flat() {
        let priced = PricedPlan {
            plan: PlanId::Starter.plan(),
            prices: PlanPrices {
                price_id: Some("price_monthly".into()),
                setup_price_id: None,
            },
        };

        let json = serde_json::to_value(&priced).unwrap();
        assert_eq!(json["id"], "starter");
        assert_eq!(json["priceId"], "price_monthly");
        assert!(json["setupPriceId"].is_null());
        assert_eq!(json["setupFee"], "499");
    }
}
