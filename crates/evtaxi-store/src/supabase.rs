//! Supabase Store
//!
//! `DashboardStore` over the hosted Postgres tables, through the PostgREST
//! API at `{SUPABASE_URL}/rest/v1/{table}`. The service key is sent both as
//! `apikey` and as the bearer token.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use evtaxi_core::{
    AdminStats, CustomerSummary, InventoryItem, NewInventoryItem, Order, OrderDetails, Profile,
    Shipment,
};
use reqwest::{Client, Method, RequestBuilder, Response, header};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::store::{DashboardStore, tables, validate_new_item, validate_quantity};

/// Supabase connection settings
#[derive(Clone, Debug)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,

    /// Service role key
    pub service_key: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, service_key: impl Into<String>) -> Self {
        let url: String = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            timeout_secs: 10,
        }
    }

    /// Read `SUPABASE_URL` and `SUPABASE_SERVICE_KEY`
    pub fn from_env() -> Result<Self> {
        let url = env_var("SUPABASE_URL")?;
        let key = env_var("SUPABASE_SERVICE_KEY")?;
        Ok(Self::new(url, key))
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.url)
    }
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| StoreError::Config(format!("{name} not set")))
}

/// Rows requested per page when reading a whole table
const PAGE_SIZE: usize = 1000;

/// Dashboard store backed by Supabase
pub struct SupabaseStore {
    client: Client,
    config: SupabaseConfig,
}

#[derive(Deserialize)]
struct AmountRow {
    total_amount: Decimal,
}

#[derive(Deserialize)]
struct UserRow {
    user_id: Uuid,
}

impl SupabaseStore {
    pub fn new(config: SupabaseConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Config(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(SupabaseConfig::from_env()?)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, self.config.table_url(table))
            .header("apikey", &self.config.service_key)
            .bearer_auth(&self.config.service_key)
    }

    /// Fail on non-2xx, keeping PostgREST's error text
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        tracing::warn!(status = %status, message = %message, "Supabase request failed");
        Err(StoreError::Http {
            status: status.as_u16(),
            message,
        })
    }

    async fn rows<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<Vec<T>> {
        let response = Self::check(builder.send().await?).await?;
        Ok(response.json().await?)
    }

    /// Every row of `table`, paged with `limit`/`offset` so the server's
    /// `max_rows` cap cannot truncate the result
    async fn all_rows<T: DeserializeOwned>(&self, table: &str, select: &str) -> Result<Vec<T>> {
        collect_pages(move |offset, limit| {
            self.rows(self.request(Method::GET, table).query(&[
                ("select", select.to_string()),
                ("order", "id".to_string()),
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
            ]))
        })
        .await
    }

    /// Exact row count from the `Content-Range` header
    async fn count(&self, table: &str, filters: &[(&str, &str)]) -> Result<u64> {
        let response = self
            .request(Method::GET, table)
            .query(&[("select", "id"), ("limit", "1")])
            .query(filters)
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let response = Self::check(response).await?;

        let range = response
            .headers()
            .get(header::CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| StoreError::Decode("missing Content-Range header".into()))?;
        parse_content_range(range)
    }
}

/// Fetch pages until one comes back empty. The next offset is the number of
/// rows seen so far, so a server cap below `PAGE_SIZE` only costs requests.
async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(usize, usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut all = Vec::new();
    loop {
        let page = fetch(all.len(), PAGE_SIZE).await?;
        if page.is_empty() {
            return Ok(all);
        }
        all.extend(page);
    }
}

/// `0-24/3573` or `*/0` → total
fn parse_content_range(value: &str) -> Result<u64> {
    value
        .rsplit_once('/')
        .and_then(|(_, total)| total.parse().ok())
        .ok_or_else(|| StoreError::Decode(format!("bad Content-Range: {value}")))
}

fn eq(id: Uuid) -> String {
    format!("eq.{id}")
}

#[async_trait]
impl DashboardStore for SupabaseStore {
    async fn list_orders(&self, user_id: Uuid) -> Result<Vec<Order>> {
        self.rows(self.request(Method::GET, tables::ORDERS).query(&[
            ("select", "*".to_string()),
            ("user_id", eq(user_id)),
            ("order", "created_at.desc".to_string()),
        ]))
        .await
    }

    async fn get_order(&self, order_id: Uuid) -> Result<Option<OrderDetails>> {
        let select = format!("*,items:{}(*)", tables::ORDER_ITEMS);
        let mut rows: Vec<OrderDetails> = self
            .rows(
                self.request(Method::GET, tables::ORDERS)
                    .query(&[("select", select), ("id", eq(order_id))]),
            )
            .await?;
        Ok(rows.pop())
    }

    async fn list_shipments(&self, user_id: Uuid) -> Result<Vec<Shipment>> {
        let orders: Vec<Order> = self
            .rows(self.request(Method::GET, tables::ORDERS).query(&[
                ("select", "*".to_string()),
                ("user_id", eq(user_id)),
                ("tracking_number", "not.is.null".to_string()),
                ("order", "created_at.desc".to_string()),
            ]))
            .await?;
        Ok(orders.iter().filter_map(Order::shipment).collect())
    }

    async fn list_customers(&self) -> Result<Vec<CustomerSummary>> {
        let profiles: Vec<Profile> = self
            .rows(
                self.request(Method::GET, tables::PROFILES)
                    .query(&[("select", "*"), ("order", "created_at.desc")]),
            )
            .await?;
        let order_users: Vec<UserRow> = self.all_rows(tables::ORDERS, "user_id").await?;

        let mut counts: HashMap<Uuid, u64> = HashMap::new();
        for row in order_users {
            *counts.entry(row.user_id).or_default() += 1;
        }

        Ok(profiles
            .into_iter()
            .map(|profile| CustomerSummary {
                total_orders: counts.get(&profile.id).copied().unwrap_or(0),
                profile,
            })
            .collect())
    }

    async fn admin_stats(&self) -> Result<AdminStats> {
        let (total_orders, total_customers, pending_shipments) = tokio::try_join!(
            self.count(tables::ORDERS, &[]),
            self.count(tables::PROFILES, &[]),
            self.count(tables::ORDERS, &[("shipping_status", "eq.pending")]),
        )?;

        let amounts: Vec<AmountRow> = self.all_rows(tables::ORDERS, "total_amount").await?;
        let total_revenue = amounts.iter().map(|r| r.total_amount).sum();

        Ok(AdminStats::from_parts(
            total_orders,
            total_customers,
            total_revenue,
            pending_shipments,
        ))
    }

    async fn list_inventory(&self) -> Result<Vec<InventoryItem>> {
        self.rows(
            self.request(Method::GET, tables::INVENTORY)
                .query(&[("select", "*"), ("order", "created_at.desc")]),
        )
        .await
    }

    async fn insert_inventory(&self, item: NewInventoryItem) -> Result<InventoryItem> {
        validate_new_item(&item)?;
        let row = item.into_item(Uuid::new_v4(), Utc::now());

        let mut inserted: Vec<InventoryItem> = self
            .rows(
                self.request(Method::POST, tables::INVENTORY)
                    .header("Prefer", "return=representation")
                    .json(&[&row]),
            )
            .await?;

        tracing::info!(id = %row.id, sku = %row.sku, "Inserted inventory item");
        inserted
            .pop()
            .ok_or_else(|| StoreError::Decode("insert returned no rows".into()))
    }

    async fn update_inventory_quantity(&self, id: Uuid, quantity: i32) -> Result<InventoryItem> {
        validate_quantity(quantity)?;

        let mut updated: Vec<InventoryItem> = self
            .rows(
                self.request(Method::PATCH, tables::INVENTORY)
                    .query(&[("id", eq(id))])
                    .header("Prefer", "return=representation")
                    .json(&json!({ "quantity": quantity, "updated_at": Utc::now() })),
            )
            .await?;

        updated
            .pop()
            .ok_or_else(|| StoreError::not_found(format!("Inventory item {id}")))
    }

    async fn delete_inventory(&self, id: Uuid) -> Result<()> {
        let deleted: Vec<InventoryItem> = self
            .rows(
                self.request(Method::DELETE, tables::INVENTORY)
                    .query(&[("id", eq(id))])
                    .header("Prefer", "return=representation"),
            )
            .await?;

        if deleted.is_empty() {
            return Err(StoreError::not_found(format!("Inventory item {id}")));
        }
        tracing::info!(id = %id, "Deleted inventory item");
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        self.count(tables::INVENTORY, &[]).await.map(|_| ())
    }

    fn name(&self) -> &str {
        "Supabase"
    }
}
