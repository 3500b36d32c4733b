//! Dashboard Models
//!
//! Row types for the hosted `orders`, `order_items`, `profiles` and
//! `inventory` tables, plus the small views the dashboard derives from them.
//! Field names match the table columns.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shipping status an order starts with
pub const SHIPPING_PENDING: &str = "pending";

/// Default low-stock threshold for new inventory items
pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;

/// Shipping address stored as JSON on the order row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address_1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// An `orders` row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_name: String,

    /// Payment/fulfilment status (e.g. "pending", "processing", "completed")
    pub status: String,

    pub total_amount: Decimal,
    pub shipping_status: String,

    #[serde(default)]
    pub tracking_number: Option<String>,

    #[serde(default)]
    pub shipping_carrier: Option<String>,

    #[serde(default)]
    pub estimated_delivery_date: Option<NaiveDate>,

    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,

    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Tracking view of this order, if it has shipped
    pub fn shipment(&self) -> Option<Shipment> {
        let tracking_number = self.tracking_number.clone()?;
        Some(Shipment {
            order_id: self.id,
            tracking_number,
            carrier: self.shipping_carrier.clone(),
            status: self.shipping_status.clone(),
            estimated_delivery: self.estimated_delivery_date,
            tracking_events: Vec::new(),
        })
    }

    pub fn is_pending_shipment(&self) -> bool {
        self.shipping_status == SHIPPING_PENDING
    }
}

/// An `order_items` row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_name: String,
    pub quantity: i32,
}

/// An order with its items embedded
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,

    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// A carrier tracking event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEvent {
    pub description: String,
    pub location: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

/// Shipment tracking derived from an order with a tracking number.
///
/// Carrier lookups are not wired up, so `tracking_events` is always empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub order_id: Uuid,
    pub tracking_number: String,
    pub carrier: Option<String>,
    pub status: String,
    pub estimated_delivery: Option<NaiveDate>,
    pub tracking_events: Vec<TrackingEvent>,
}

/// A `profiles` row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub car_make: Option<String>,
    #[serde(default)]
    pub car_model: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// A profile with its order count, for the admin customer list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSummary {
    #[serde(flatten)]
    pub profile: Profile,
    pub total_orders: u64,
}

/// Admin dashboard counters
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminStats {
    pub total_orders: u64,
    pub total_customers: u64,
    pub total_revenue: Decimal,
    pub pending_shipments: u64,

    /// No session tracking exists; mirrors `total_customers`
    pub active_users: u64,

    /// App builds are tracked outside this system
    pub pending_apps: u64,
}

impl AdminStats {
    pub fn from_parts(
        total_orders: u64,
        total_customers: u64,
        total_revenue: Decimal,
        pending_shipments: u64,
    ) -> Self {
        Self {
            total_orders,
            total_customers,
            total_revenue,
            pending_shipments,
            active_users: total_customers,
            pending_apps: 0,
        }
    }

    /// Aggregate directly from order rows
    pub fn from_orders(orders: &[Order], total_customers: u64) -> Self {
        let total_revenue = orders.iter().map(|o| o.total_amount).sum();
        let pending = orders.iter().filter(|o| o.is_pending_shipment()).count();
        Self::from_parts(orders.len() as u64, total_customers, total_revenue, pending as u64)
    }
}

/// An `inventory` row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub item_type: String,
    pub item_name: String,
    pub sku: String,
    pub quantity: i32,
    pub low_stock_threshold: i32,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stock level badge shown next to an inventory row
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    InStock,
    Low,
    Out,
}

impl InventoryItem {
    pub const fn stock_level(&self) -> StockLevel {
        if self.quantity <= 0 {
            StockLevel::Out
        } else if self.quantity <= self.low_stock_threshold {
            StockLevel::Low
        } else {
            StockLevel::InStock
        }
    }
}

/// Payload for inserting an inventory row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInventoryItem {
    #[serde(default)]
    pub item_type: String,
    #[serde(default)]
    pub item_name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default = "default_threshold")]
    pub low_stock_threshold: i32,
    #[serde(default)]
    pub category: String,
}

const fn default_threshold() -> i32 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

impl NewInventoryItem {
    /// Names of required text fields left blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("item_type", &self.item_type),
            ("item_name", &self.item_name),
            ("sku", &self.sku),
            ("category", &self.category),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Materialize into a row with the given id and timestamp
    pub fn into_item(self, id: Uuid, now: DateTime<Utc>) -> InventoryItem {
        InventoryItem {
            id,
            item_type: self.item_type,
            item_name: self.item_name,
            sku: self.sku,
            quantity: self.quantity,
            low_stock_threshold: self.low_stock_threshold,
            category: self.category,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Search box plus category dropdown on the inventory screen
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryFilter {
    #[serde(default)]
    pub search: Option<String>,

    /// Exact category; empty or "all" matches everything
    #[serde(default)]
    pub category: Option<String>,
}

impl InventoryFilter {
    pub fn matches(&self, item: &InventoryItem) -> bool {
        let search_ok = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(query) => {
                let query = query.to_lowercase();
                item.item_name.to_lowercase().contains(&query)
                    || item.sku.to_lowercase().contains(&query)
            }
        };

        let category_ok = match self.category.as_deref().map(str::trim) {
            None | Some("" | "all") => true,
            Some(category) => item.category == category,
        };

        search_ok && category_ok
    }

    pub fn apply(&self, items: Vec<InventoryItem>) -> Vec<InventoryItem> {
        items.into_iter().filter(|item| self.matches(item)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn order(shipping_status: &str, total: Decimal, tracking: Option<&str>) -> Order {
        Order {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            plan_name: "Starter".into(),
            status: "completed".into(),
            total_amount: total,
            shipping_status: shipping_status.into(),
            tracking_number: tracking.map(String::from),
            shipping_carrier: Some("UPS".into()),
            estimated_delivery_date: None,
            shipping_address: None,
            created_at: Utc::now(),
        }
    }

    fn item(name: &str, sku: &str, category: &str, quantity: i32) -> InventoryItem {
        NewInventoryItem {
            item_type: "sign".into(),
            item_name: name.into(),
            sku: sku.into(),
            quantity,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            category: category.into(),
        }
        .into_item(Uuid::nil(), Utc::now())
    }

    #[test]
    fn test_stock_levels() {
        assert_eq!(item("QR", "QR-1", "signs", 0).stock_level(), StockLevel::Out);
        assert_eq!(item("QR", "QR-1", "signs", 10).stock_level(), StockLevel::Low);
        assert_eq!(item("QR", "QR-1", "signs", 11).stock_level(), StockLevel::InStock);
    }

    #[test]
    fn test_inventory_filter() {
        let items = vec![
            item("Vinyl QR Sign", "QR-V", "signs", 5),
            item("NFC Card", "NFC-1", "cards", 40),
        ];

        let by_sku = InventoryFilter {
            search: Some("nfc".into()),
            category: None,
        };
        assert_eq!(by_sku.apply(items.clone()).len(), 1);

        let all = InventoryFilter {
            search: Some("  ".into()),
            category: Some("all".into()),
        };
        assert_eq!(all.apply(items.clone()).len(), 2);

        let wrong_category = InventoryFilter {
            search: Some("qr".into()),
            category: Some("cards".into()),
        };
        assert!(wrong_category.apply(items).is_empty());
    }

    #[test]
    fn test_new_item_defaults() {
        let parsed: NewInventoryItem = serde_json::from_value(serde_json::json!({
            "item_type": "card",
            "item_name": "NFC Card",
            "sku": "NFC-1",
            "category": "cards"
        }))
        .unwrap();
        assert_eq!(parsed.quantity, 0);
        assert_eq!(parsed.low_stock_threshold, 10);
        assert!(parsed.missing_fields().is_empty());
    }

    #[test]
    fn test_missing_fields() {
        let new_item = NewInventoryItem {
            item_type: String::new(),
            item_name: "Sign".into(),
            sku: " ".into(),
            quantity: 1,
            low_stock_threshold: 1,
            category: "signs".into(),
        };
        assert_eq!(new_item.missing_fields(), ["item_type", "sku"]);
    }

    #[test]
    fn test_shipment_requires_tracking_number() {
        assert!(order("pending", dec!(10), None).shipment().is_none());

        let shipment = order("in_transit", dec!(10), Some("1Z999")).shipment().unwrap();
        assert_eq!(shipment.tracking_number, "1Z999");
        assert_eq!(shipment.status, "in_transit");
        assert!(shipment.tracking_events.is_empty());
    }

    #[test]
    fn test_admin_stats_from_orders() {
        let orders = vec![
            order("pending", dec!(528.99), None),
            order("shipped", dec!(848.99), Some("1Z")),
            order("pending", dec!(1598), None),
        ];

        let stats = AdminStats::from_orders(&orders, 7);
        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.total_revenue, dec!(2975.98));
        assert_eq!(stats.pending_shipments, 2);
        assert_eq!(stats.active_users, 7);
        assert_eq!(stats.pending_apps, 0);
    }
}
