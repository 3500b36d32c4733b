//! In-Memory Store
//!
//! Holds the four tables in process memory. Used for tests and for running
//! the dashboards locally without a hosted database (`STORE_MODE=memory`).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use evtaxi_core::{
    AdminStats, CustomerSummary, InventoryItem, NewInventoryItem, Order, OrderDetails, OrderItem,
    Profile,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::store::{DashboardStore, validate_new_item, validate_quantity};

#[derive(Default)]
struct Tables {
    orders: HashMap<Uuid, Order>,
    order_items: HashMap<Uuid, OrderItem>,
    profiles: HashMap<Uuid, Profile>,
    inventory: HashMap<Uuid, InventoryItem>,
}

/// Dashboard store backed by `RwLock<HashMap>` tables
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed rows, replacing any with the same id
    pub async fn seed(
        &self,
        profiles: Vec<Profile>,
        orders: Vec<Order>,
        items: Vec<OrderItem>,
        inventory: Vec<InventoryItem>,
    ) {
        let mut tables = self.tables.write().await;
        tables.profiles.extend(profiles.into_iter().map(|p| (p.id, p)));
        tables.orders.extend(orders.into_iter().map(|o| (o.id, o)));
        tables.order_items.extend(items.into_iter().map(|i| (i.id, i)));
        tables.inventory.extend(inventory.into_iter().map(|i| (i.id, i)));
    }
}

#[async_trait]
impl DashboardStore for MemoryStore {
    async fn list_orders(&self, user_id: Uuid) -> Result<Vec<Order>> {
        let tables = self.tables.read().await;
        let mut orders: Vec<Order> = tables
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn get_order(&self, order_id: Uuid) -> Result<Option<OrderDetails>> {
        let tables = self.tables.read().await;
        let Some(order) = tables.orders.get(&order_id) else {
            return Ok(None);
        };

        let mut items: Vec<OrderItem> = tables
            .order_items
            .values()
            .filter(|i| i.order_id == order_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.item_name.cmp(&b.item_name));

        Ok(Some(OrderDetails {
            order: order.clone(),
            items,
        }))
    }

    async fn list_customers(&self) -> Result<Vec<CustomerSummary>> {
        let tables = self.tables.read().await;

        let mut counts: HashMap<Uuid, u64> = HashMap::new();
        for order in tables.orders.values() {
            *counts.entry(order.user_id).or_default() += 1;
        }

        let mut customers: Vec<CustomerSummary> = tables
            .profiles
            .values()
            .map(|profile| CustomerSummary {
                total_orders: counts.get(&profile.id).copied().unwrap_or(0),
                profile: profile.clone(),
            })
            .collect();
        customers.sort_by(|a, b| b.profile.created_at.cmp(&a.profile.created_at));
        Ok(customers)
    }

    async fn admin_stats(&self) -> Result<AdminStats> {
        let tables = self.tables.read().await;
        let orders: Vec<Order> = tables.orders.values().cloned().collect();
        Ok(AdminStats::from_orders(&orders, tables.profiles.len() as u64))
    }

    async fn list_inventory(&self) -> Result<Vec<InventoryItem>> {
        let tables = self.tables.read().await;
        let mut items: Vec<InventoryItem> = tables.inventory.values().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn insert_inventory(&self, item: NewInventoryItem) -> Result<InventoryItem> {
        validate_new_item(&item)?;

        let row = item.into_item(Uuid::new_v4(), Utc::now());
        self.tables
            .write()
            .await
            .inventory
            .insert(row.id, row.clone());

        tracing::debug!(id = %row.id, sku = %row.sku, "Inserted inventory item");
        Ok(row)
    }

    async fn update_inventory_quantity(&self, id: Uuid, quantity: i32) -> Result<InventoryItem> {
        validate_quantity(quantity)?;

        let mut tables = self.tables.write().await;
        let row = tables
            .inventory
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(format!("Inventory item {id}")))?;
        row.quantity = quantity;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_inventory(&self, id: Uuid) -> Result<()> {
        self.tables
            .write()
            .await
            .inventory
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(format!("Inventory item {id}")))
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "Memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use rust_decimal_macros::dec;

    fn profile(id: Uuid) -> Profile {
        Profile {
            id,
            email: "driver@example.com".into(),
            first_name: "Sam".into(),
            last_name: "Rivera".into(),
            phone: None,
            car_make: Some("Tesla".into()),
            car_model: Some("Model 3".into()),
            city: Some("Austin".into()),
            state: Some("TX".into()),
            created_at: Utc::now(),
        }
    }

    fn order(user_id: Uuid, age_days: i64, tracking: Option<&str>, shipping_status: &str) -> Order {
        Order {
            id: Uuid::new_v4(),
            user_id,
            plan_name: "Starter".into(),
            status: "paid".into(),
            total_amount: dec!(528.99),
            shipping_status: shipping_status.into(),
            tracking_number: tracking.map(String::from),
            shipping_carrier: tracking.map(|_| "UPS".to_string()),
            estimated_delivery_date: NaiveDate::from_ymd_opt(2026, 11, 2),
            shipping_address: None,
            created_at: Utc::now() - Duration::days(age_days),
        }
    }

    fn new_item(sku: &str, quantity: i32) -> NewInventoryItem {
        NewInventoryItem {
            item_type: "qr_sticker".into(),
            item_name: "QR Window Sticker".into(),
            sku: sku.into(),
            quantity,
            low_stock_threshold: 10,
            category: "stickers".into(),
        }
    }

    #[tokio::test]
    async fn test_orders_newest_first_and_shipments() {
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();
        let old = order(user, 10, Some("1Z999"), "shipped");
        let new = order(user, 1, None, "pending");

        let store = MemoryStore::new();
        store
            .seed(
                vec![profile(user)],
                vec![old.clone(), new.clone(), order(other, 0, None, "pending")],
                vec![],
                vec![],
            )
            .await;

        let orders = store.list_orders(user).await.unwrap();
        assert_eq!(orders.iter().map(|o| o.id).collect::<Vec<_>>(), vec![new.id, old.id]);

        let shipments = store.list_shipments(user).await.unwrap();
        assert_eq!(shipments.len(), 1);
        assert_eq!(shipments[0].order_id, old.id);
        assert_eq!(shipments[0].tracking_number, "1Z999");
        assert!(shipments[0].tracking_events.is_empty());
    }

    #[tokio::test]
    async fn test_order_details_embed_items() {
        let user = Uuid::new_v4();
        let o = order(user, 0, None, "pending");
        let item = OrderItem {
            id: Uuid::new_v4(),
            order_id: o.id,
            item_name: "NFC Tap Card".into(),
            quantity: 2,
        };

        let store = MemoryStore::new();
        store.seed(vec![], vec![o.clone()], vec![item.clone()], vec![]).await;

        let details = store.get_order(o.id).await.unwrap().unwrap();
        assert_eq!(details.items, vec![item]);
        assert!(store.get_order(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_customers_and_stats() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let store = MemoryStore::new();
        store
            .seed(
                vec![profile(a), profile(b)],
                vec![
                    order(a, 2, None, "pending"),
                    order(a, 1, Some("1Z1"), "shipped"),
                    order(b, 0, None, "pending"),
                ],
                vec![],
                vec![],
            )
            .await;

        let customers = store.list_customers().await.unwrap();
        let count_for = |id| {
            customers
                .iter()
                .find(|c| c.profile.id == id)
                .map(|c| c.total_orders)
        };
        assert_eq!(count_for(a), Some(2));
        assert_eq!(count_for(b), Some(1));

        let stats = store.admin_stats().await.unwrap();
        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.total_customers, 2);
        assert_eq!(stats.active_users, 2);
        assert_eq!(stats.total_revenue, dec!(1586.97));
        assert_eq!(stats.pending_shipments, 2);
        assert_eq!(stats.pending_apps, 0);
    }

    #[tokio::test]
    async fn test_inventory_crud() {
        let store = MemoryStore::new();

        let row = store.insert_inventory(new_item("QR-001", 40)).await.unwrap();
        assert_eq!(row.created_at, row.updated_at);
        assert_eq!(store.list_inventory().await.unwrap().len(), 1);

        let updated = store.update_inventory_quantity(row.id, 3).await.unwrap();
        assert_eq!(updated.quantity, 3);
        assert!(updated.updated_at >= row.updated_at);

        assert!(matches!(
            store.update_inventory_quantity(row.id, -5).await,
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            store.update_inventory_quantity(Uuid::new_v4(), 1).await,
            Err(StoreError::NotFound(_))
        ));

        store.delete_inventory(row.id).await.unwrap();
        assert!(store.list_inventory().await.unwrap().is_empty());
        assert!(matches!(
            store.delete_inventory(row.id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_insert_rejects_blank_fields() {
        let store = MemoryStore::new();
        let item = NewInventoryItem {
            item_name: String::new(),
            ..new_item("QR-002", 1)
        };
        assert!(matches!(
            store.insert_inventory(item).await,
            Err(StoreError::Validation(_))
        ));
    }
}
