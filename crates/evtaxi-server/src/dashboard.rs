//! Dashboard Handlers
//!
//! Customer views (orders, order details, shipments) and admin views
//! (stats, customers, inventory) over the configured [`DashboardStore`].
//!
//! [`DashboardStore`]: evtaxi_store::DashboardStore

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use evtaxi_core::{
    AdminStats, CustomerSummary, InventoryFilter, InventoryItem, NewInventoryItem, Order,
    OrderDetails, Shipment,
};
use evtaxi_store::StoreError;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

impl UserQuery {
    fn user_id(&self) -> Result<Uuid, ApiError> {
        let raw = self
            .user_id
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::bad_request("Missing user_id"))?;
        parse_id(raw, "user_id")
    }
}

#[derive(Debug, Deserialize)]
pub struct QuantityUpdate {
    #[serde(default)]
    pub quantity: Option<i32>,
}

fn parse_id(raw: &str, name: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("Invalid {name}: {raw}")))
}

// ============================================================================
// Customer dashboard
// ============================================================================

pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let user_id = query.user_id()?;
    Ok(Json(state.store()?.list_orders(user_id).await?))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<OrderDetails>, ApiError> {
    let id = parse_id(&order_id, "order id")?;
    state
        .store()?
        .get_order(id)
        .await?
        .map(Json)
        .ok_or_else(|| StoreError::not_found(format!("Order {id}")).into())
}

pub async fn list_shipments(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<Shipment>>, ApiError> {
    let user_id = query.user_id()?;
    Ok(Json(state.store()?.list_shipments(user_id).await?))
}

// ============================================================================
// Admin dashboard
// ============================================================================

pub async fn admin_stats(State(state): State<AppState>) -> Result<Json<AdminStats>, ApiError> {
    Ok(Json(state.store()?.admin_stats().await?))
}

pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerSummary>>, ApiError> {
    Ok(Json(state.store()?.list_customers().await?))
}

/// Inventory, narrowed by the `search` and `category` query parameters
pub async fn list_inventory(
    State(state): State<AppState>,
    Query(filter): Query<InventoryFilter>,
) -> Result<Json<Vec<InventoryItem>>, ApiError> {
    let items = state.store()?.list_inventory().await?;
    Ok(Json(filter.apply(items)))
}

pub async fn create_inventory(
    State(state): State<AppState>,
    JsonBody(item): JsonBody<NewInventoryItem>,
) -> Result<(StatusCode, Json<InventoryItem>), ApiError> {
    let row = state.store()?.insert_inventory(item).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_inventory(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<QuantityUpdate>,
) -> Result<Json<InventoryItem>, ApiError> {
    let id = parse_id(&id, "inventory id")?;
    let quantity = update
        .quantity
        .ok_or_else(|| ApiError::bad_request("Missing required fields: quantity"))?;
    Ok(Json(
        state.store()?.update_inventory_quantity(id, quantity).await?,
    ))
}

pub async fn delete_inventory(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id, "inventory id")?;
    state.store()?.delete_inventory(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
