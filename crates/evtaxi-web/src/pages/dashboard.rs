//! Customer Dashboard
//!
//! Orders, order details and shipment tracking for the signed-in driver.
//! The user id arrives as `?user_id=` from the hosted auth redirect.

use evtaxi_core::{Order, OrderDetails, Shipment, format_usd};
use leptos::prelude::*;
use leptos_router::hooks::{use_params_map, use_query_map};

use crate::api;

fn user_id() -> Option<String> {
    use_query_map().get_untracked().get("user_id")
}

fn status_class(status: &str) -> String {
    format!("badge status-{}", status.to_lowercase().replace(' ', "-"))
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let (orders, set_orders) = signal(None::<Result<Vec<Order>, String>>);
    let (shipments, set_shipments) = signal(None::<Result<Vec<Shipment>, String>>);
    let user = user_id();
    let query = user.clone().map(|u| format!("?user_id={u}")).unwrap_or_default();

    leptos::task::spawn_local(async move {
        let Some(user) = user else {
            set_orders.set(Some(Err("Please sign in to view your orders".into())));
            set_shipments.set(Some(Ok(Vec::new())));
            return;
        };
        set_orders.set(Some(api::fetch_orders(&user).await));
        set_shipments.set(Some(api::fetch_shipments(&user).await));
    });

    view! {
        <div class="dashboard">
            <h1>"My Orders"</h1>
            {move || {
                let query = query.clone();
                match orders.get() {
                    None => view! { <p>"Loading orders..."</p> }.into_any(),
                    Some(Err(e)) => view! { <p class="error">{e}</p> }.into_any(),
                    Some(Ok(list)) if list.is_empty() => {
                        view! { <p>"No orders yet."</p> }.into_any()
                    }
                    Some(Ok(list)) => view! {
                        <table class="orders">
                            <thead>
                                <tr>
                                    <th>"Order"</th>
                                    <th>"Plan"</th>
                                    <th>"Total"</th>
                                    <th>"Status"</th>
                                    <th>"Shipping"</th>
                                    <th>"Placed"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {list
                                    .into_iter()
                                    .map(|o| {
                                        let href = format!("/dashboard/orders/{}{query}", o.id);
                                        let short = o.id.to_string()[..8].to_string();
                                        view! {
                                            <tr>
                                                <td><a href=href>{short}</a></td>
                                                <td>{o.plan_name}</td>
                                                <td>{format_usd(o.total_amount)}</td>
                                                <td><span class=status_class(&o.status)>{o.status.clone()}</span></td>
                                                <td>{o.shipping_status}</td>
                                                <td>{o.created_at.format("%b %e, %Y").to_string()}</td>
                                            </tr>
                                        }
                                    })
                                    .collect_view()}
                            </tbody>
                        </table>
                    }
                    .into_any(),
                }
            }}

            <h2>"Shipments"</h2>
            {move || match shipments.get() {
                None => view! { <p>"Loading shipments..."</p> }.into_any(),
                Some(Err(e)) => view! { <p class="error">{e}</p> }.into_any(),
                Some(Ok(list)) if list.is_empty() => {
                    view! { <p>"Nothing has shipped yet."</p> }.into_any()
                }
                Some(Ok(list)) => list
                    .into_iter()
                    .map(|s| view! { <ShipmentCard shipment=s /> })
                    .collect_view()
                    .into_any(),
            }}
        </div>
    }
}

#[component]
fn ShipmentCard(shipment: Shipment) -> impl IntoView {
    let carrier = shipment.carrier.unwrap_or_else(|| "Carrier pending".into());
    let eta = shipment
        .estimated_delivery
        .map_or_else(|| "TBD".to_string(), |d| d.format("%b %e, %Y").to_string());

    view! {
        <div class="shipment">
            <h3>{shipment.tracking_number}</h3>
            <p>{carrier}" · "<span class=status_class(&shipment.status)>{shipment.status.clone()}</span></p>
            <p>"Estimated delivery: "{eta}</p>
        </div>
    }
}

#[component]
pub fn OrderDetailsPage() -> impl IntoView {
    let (order, set_order) = signal(None::<Result<OrderDetails, String>>);
    let id = use_params_map().get_untracked().get("id").unwrap_or_default();
    let back = user_id()
        .map(|u| format!("/dashboard?user_id={u}"))
        .unwrap_or_else(|| "/dashboard".into());

    leptos::task::spawn_local(async move {
        set_order.set(Some(api::fetch_order(&id).await));
    });

    view! {
        <div class="dashboard order-details">
            <a href=back class="back">"← Back to orders"</a>
            {move || match order.get() {
                None => view! { <p>"Loading order..."</p> }.into_any(),
                Some(Err(e)) => view! { <p class="error">{e}</p> }.into_any(),
                Some(Ok(details)) => {
                    let o = details.order;
                    let address = o.shipping_address.map(|a| {
                        let line2 = a.address_2.map(|l| format!(", {l}")).unwrap_or_default();
                        format!(
                            "{}{line2}, {}, {} {}, {}",
                            a.address_1, a.city, a.state, a.zip_code, a.country
                        )
                    });
                    view! {
                        <h1>{format!("{} plan", o.plan_name)}</h1>
                        <p>"Total: "{format_usd(o.total_amount)}</p>
                        <p>"Status: "<span class=status_class(&o.status)>{o.status.clone()}</span></p>
                        <p>"Shipping: "{o.shipping_status}</p>
                        {o.tracking_number.map(|t| view! { <p>"Tracking: "{t}</p> })}
                        {address.map(|a| view! { <p>"Ship to: "{a}</p> })}
                        <h2>"Items"</h2>
                        <ul>
                            {details
                                .items
                                .into_iter()
                                .map(|i| view! { <li>{i.item_name}" × "{i.quantity}</li> })
                                .collect_view()}
                        </ul>
                    }
                    .into_any()
                }
            }}
        </div>
    }
}
