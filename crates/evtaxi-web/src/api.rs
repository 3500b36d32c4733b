//! API Client

use evtaxi_core::{
    AdminStats, CustomerSummary, InventoryItem, NewInventoryItem, Order, OrderDetails, PricedPlan,
    Shipment,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;

/// `{ sessionId, url }` from the checkout endpoints
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub session_id: String,
    pub url: Option<String>,
}

/// Result of `verify-session`
#[derive(Clone, Debug, Deserialize)]
pub struct VerifiedSession {
    pub payment_status: Option<String>,
    pub plan_name: Option<String>,
}

fn origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:3000".into())
}

/// reqwest on WASM needs absolute URLs
fn url(path: &str) -> String {
    format!("{}{path}", origin())
}

/// Pull the `error` field out of a failed response
async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let data: serde_json::Value = response.json().await.unwrap_or_default();
    data["error"]
        .as_str()
        .map_or_else(|| format!("Request failed ({status})"), String::from)
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, String> {
    if response.status().is_success() {
        response.json().await.map_err(|e| e.to_string())
    } else {
        Err(error_message(response).await)
    }
}

async fn get<T: DeserializeOwned>(path: &str) -> Result<T, String> {
    let response = reqwest::get(url(path)).await.map_err(|e| e.to_string())?;
    decode(response).await
}

async fn send<B: Serialize, T: DeserializeOwned>(
    method: reqwest::Method,
    path: &str,
    body: &B,
) -> Result<T, String> {
    let response = reqwest::Client::new()
        .request(method, url(path))
        .json(body)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    decode(response).await
}

/// Send the browser to a hosted checkout page
pub fn redirect(session: &CheckoutSession) -> Result<(), String> {
    let url = session
        .url
        .as_deref()
        .ok_or_else(|| "Checkout session has no URL".to_string())?;
    leptos::logging::log!("Redirecting to checkout session {}", session.session_id);
    web_sys::window()
        .ok_or_else(|| "No window".to_string())?
        .location()
        .set_href(url)
        .map_err(|_| "Redirect failed".to_string())
}

// ============================================================================
// Checkout
// ============================================================================

pub async fn fetch_plans() -> Result<Vec<PricedPlan>, String> {
    get("/api/plans").await
}

/// Start checkout for a plan: the setup fee first when one is configured,
/// otherwise the monthly price alone
pub async fn start_checkout(plan: &PricedPlan) -> Result<CheckoutSession, String> {
    let name = &plan.plan.name;
    match (&plan.prices.price_id, &plan.prices.setup_price_id) {
        (Some(price), Some(setup)) => {
            send(
                reqwest::Method::POST,
                "/api/stripe/create-setup-session",
                &json!({
                    "subscriptionPriceId": price,
                    "setupPriceId": setup,
                    "planName": name,
                }),
            )
            .await
        }
        (Some(price), None) => {
            send(
                reqwest::Method::POST,
                "/api/stripe/create-checkout-session",
                &json!({ "priceId": price, "planName": name }),
            )
            .await
        }
        _ => Err(format!("{name} is not available for online checkout yet")),
    }
}

pub async fn create_subscription(setup_session_id: &str) -> Result<CheckoutSession, String> {
    send(
        reqwest::Method::POST,
        "/api/stripe/create-subscription",
        &json!({ "setupSessionId": setup_session_id }),
    )
    .await
}

pub async fn verify_session(session_id: &str) -> Result<VerifiedSession, String> {
    send(
        reqwest::Method::POST,
        "/api/stripe/verify-session",
        &json!({ "sessionId": session_id }),
    )
    .await
}

// ============================================================================
// Dashboard
// ============================================================================

pub async fn fetch_orders(user_id: &str) -> Result<Vec<Order>, String> {
    get(&format!("/api/orders?user_id={user_id}")).await
}

pub async fn fetch_order(order_id: &str) -> Result<OrderDetails, String> {
    get(&format!("/api/orders/{order_id}")).await
}

pub async fn fetch_shipments(user_id: &str) -> Result<Vec<Shipment>, String> {
    get(&format!("/api/orders/shipments?user_id={user_id}")).await
}

pub async fn fetch_stats() -> Result<AdminStats, String> {
    get("/api/admin/stats").await
}

pub async fn fetch_customers() -> Result<Vec<CustomerSummary>, String> {
    get("/api/admin/customers").await
}

pub async fn fetch_inventory() -> Result<Vec<InventoryItem>, String> {
    get("/api/admin/inventory").await
}

pub async fn add_inventory(item: &NewInventoryItem) -> Result<InventoryItem, String> {
    send(reqwest::Method::POST, "/api/admin/inventory", item).await
}

pub async fn set_quantity(id: &str, quantity: i32) -> Result<InventoryItem, String> {
    send(
        reqwest::Method::PATCH,
        &format!("/api/admin/inventory/{id}"),
        &json!({ "quantity": quantity }),
    )
    .await
}

pub async fn remove_inventory(id: &str) -> Result<(), String> {
    let response = reqwest::Client::new()
        .delete(url(&format!("/api/admin/inventory/{id}")))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        Ok(())
    } else {
        Err(error_message(response).await)
    }
}
