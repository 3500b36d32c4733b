//! Dashboard Store Trait
//!
//! Everything the customer and admin dashboards read or write goes through
//! [`DashboardStore`].

use async_trait::async_trait;
use evtaxi_core::{
    AdminStats, CustomerSummary, InventoryItem, NewInventoryItem, Order, OrderDetails, Shipment,
};
use uuid::Uuid;

use crate::error::{Result, StoreError};

/// Table names in the hosted store
pub mod tables {
    pub const ORDERS: &str = "orders";
    pub const ORDER_ITEMS: &str = "order_items";
    pub const PROFILES: &str = "profiles";
    pub const INVENTORY: &str = "inventory";
}

/// Data access for the dashboards
#[async_trait]
pub trait DashboardStore: Send + Sync {
    /// Orders placed by a user, newest first
    async fn list_orders(&self, user_id: Uuid) -> Result<Vec<Order>>;

    /// One order with its items embedded
    async fn get_order(&self, order_id: Uuid) -> Result<Option<OrderDetails>>;

    /// A user's orders that have shipped, newest first
    async fn list_shipments(&self, user_id: Uuid) -> Result<Vec<Shipment>> {
        Ok(self
            .list_orders(user_id)
            .await?
            .iter()
            .filter_map(Order::shipment)
            .collect())
    }

    /// Every profile with its order count
    async fn list_customers(&self) -> Result<Vec<CustomerSummary>>;

    async fn admin_stats(&self) -> Result<AdminStats>;

    /// Inventory rows, newest first
    async fn list_inventory(&self) -> Result<Vec<InventoryItem>>;

    /// Insert a row; timestamps are set by the store
    async fn insert_inventory(&self, item: NewInventoryItem) -> Result<InventoryItem>;

    /// Set the on-hand quantity and bump `updated_at`
    async fn update_inventory_quantity(&self, id: Uuid, quantity: i32) -> Result<InventoryItem>;

    async fn delete_inventory(&self, id: Uuid) -> Result<()>;

    /// Check the store is reachable
    async fn health_check(&self) -> Result<()>;

    /// Store name for logs and health output
    fn name(&self) -> &str;
}

/// Reject inventory rows with blank required fields or negative counts
pub fn validate_new_item(item: &NewInventoryItem) -> Result<()> {
    let missing = item.missing_fields();
    if !missing.is_empty() {
        return Err(StoreError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }
    validate_quantity(item.quantity)?;
    if item.low_stock_threshold < 0 {
        return Err(StoreError::Validation(
            "Low stock threshold cannot be negative".into(),
        ));
    }
    Ok(())
}

pub fn validate_quantity(quantity: i32) -> Result<()> {
    if quantity < 0 {
        return Err(StoreError::Validation("Quantity cannot be negative".into()));
    }
    Ok(())
}
