//! Admin Dashboard
//!
//! Business stats, customer list and inventory management.

use evtaxi_core::{
    AdminStats, CustomerSummary, InventoryFilter, InventoryItem, NewInventoryItem, format_usd,
};
use leptos::prelude::*;

use crate::api;
use crate::components::{ErrorBanner, StatCard, StockBadge};

#[component]
pub fn AdminPage() -> impl IntoView {
    let (stats, set_stats) = signal(None::<Result<AdminStats, String>>);
    let (customers, set_customers) = signal(None::<Result<Vec<CustomerSummary>, String>>);

    leptos::task::spawn_local(async move {
        set_stats.set(Some(api::fetch_stats().await));
        set_customers.set(Some(api::fetch_customers().await));
    });

    view! {
        <div class="admin">
            <nav class="admin-nav">
                <a href="/admin">"Overview"</a>
                <a href="/admin/inventory">"Inventory"</a>
            </nav>

            <h1>"Admin Dashboard"</h1>
            {move || match stats.get() {
                None => view! { <p>"Loading stats..."</p> }.into_any(),
                Some(Err(e)) => view! { <p class="error">{e}</p> }.into_any(),
                Some(Ok(s)) => view! {
                    <div class="stats">
                        <StatCard label="Total Orders" value=s.total_orders.to_string() />
                        <StatCard label="Customers" value=s.total_customers.to_string() />
                        <StatCard label="Revenue" value=format_usd(s.total_revenue) />
                        <StatCard label="Pending Shipments" value=s.pending_shipments.to_string() />
                        <StatCard label="Active Users" value=s.active_users.to_string() />
                        <StatCard label="Pending Apps" value=s.pending_apps.to_string() />
                    </div>
                }
                .into_any(),
            }}

            <h2>"Customers"</h2>
            {move || match customers.get() {
                None => view! { <p>"Loading customers..."</p> }.into_any(),
                Some(Err(e)) => view! { <p class="error">{e}</p> }.into_any(),
                Some(Ok(list)) => view! {
                    <table class="customers">
                        <thead>
                            <tr>
                                <th>"Name"</th>
                                <th>"Email"</th>
                                <th>"Vehicle"</th>
                                <th>"Location"</th>
                                <th>"Orders"</th>
                            </tr>
                        </thead>
                        <tbody>
                            {list
                                .into_iter()
                                .map(|c| {
                                    let p = c.profile;
                                    let name = p.full_name();
                                    let vehicle = [p.car_make, p.car_model]
                                        .into_iter()
                                        .flatten()
                                        .collect::<Vec<_>>()
                                        .join(" ");
                                    let location = [p.city, p.state]
                                        .into_iter()
                                        .flatten()
                                        .collect::<Vec<_>>()
                                        .join(", ");
                                    view! {
                                        <tr>
                                            <td>{name}</td>
                                            <td>{p.email}</td>
                                            <td>{vehicle}</td>
                                            <td>{location}</td>
                                            <td>{c.total_orders}</td>
                                        </tr>
                                    }
                                })
                                .collect_view()}
                        </tbody>
                    </table>
                }
                .into_any(),
            }}
        </div>
    }
}

#[component]
pub fn InventoryPage() -> impl IntoView {
    let (items, set_items) = signal(Vec::<InventoryItem>::new());
    let (error, set_error) = signal(None::<String>);
    let (search, set_search) = signal(String::new());
    let (category, set_category) = signal(String::from("all"));

    let (new_name, set_new_name) = signal(String::new());
    let (new_sku, set_new_sku) = signal(String::new());
    let (new_type, set_new_type) = signal(String::new());
    let (new_category, set_new_category) = signal(String::new());
    let (new_quantity, set_new_quantity) = signal(0_i32);

    let reload = move || {
        leptos::task::spawn_local(async move {
            match api::fetch_inventory().await {
                Ok(list) => set_items.set(list),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };
    reload();

    let filtered = move || {
        let filter = InventoryFilter {
            search: Some(search.get()),
            category: Some(category.get()),
        };
        filter.apply(items.get())
    };

    let categories = move || {
        let mut names: Vec<String> = items.get().into_iter().map(|i| i.category).collect();
        names.sort();
        names.dedup();
        names
    };

    let add = move |_| {
        let item = NewInventoryItem {
            item_type: new_type.get(),
            item_name: new_name.get(),
            sku: new_sku.get(),
            quantity: new_quantity.get(),
            low_stock_threshold: evtaxi_core::model::DEFAULT_LOW_STOCK_THRESHOLD,
            category: new_category.get(),
        };
        let missing = item.missing_fields();
        if !missing.is_empty() {
            set_error.set(Some(format!("Please fill in: {}", missing.join(", "))));
            return;
        }
        leptos::task::spawn_local(async move {
            match api::add_inventory(&item).await {
                Ok(row) => {
                    set_error.set(None);
                    set_items.update(|items| items.insert(0, row));
                    set_new_name.set(String::new());
                    set_new_sku.set(String::new());
                }
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    let adjust = move |id: String, quantity: i32| {
        leptos::task::spawn_local(async move {
            match api::set_quantity(&id, quantity.max(0)).await {
                Ok(row) => set_items.update(|items| {
                    if let Some(existing) = items.iter_mut().find(|i| i.id == row.id) {
                        *existing = row;
                    }
                }),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    let remove = move |id: String| {
        leptos::task::spawn_local(async move {
            match api::remove_inventory(&id).await {
                Ok(()) => set_items.update(|items| items.retain(|i| i.id.to_string() != id)),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    view! {
        <div class="admin inventory">
            <nav class="admin-nav">
                <a href="/admin">"Overview"</a>
                <a href="/admin/inventory">"Inventory"</a>
            </nav>

            <h1>"Inventory"</h1>
            <ErrorBanner error=error />

            <div class="filters">
                <input
                    type="search"
                    placeholder="Search by name or SKU"
                    prop:value=move || search.get()
                    on:input=move |ev| set_search.set(event_target_value(&ev))
                />
                <select on:change=move |ev| set_category.set(event_target_value(&ev))>
                    <option value="all">"All categories"</option>
                    {move || {
                        categories()
                            .into_iter()
                            .map(|c| view! { <option value=c.clone()>{c.clone()}</option> })
                            .collect_view()
                    }}
                </select>
            </div>

            <table class="inventory-table">
                <thead>
                    <tr>
                        <th>"Item"</th>
                        <th>"SKU"</th>
                        <th>"Category"</th>
                        <th>"Quantity"</th>
                        <th>"Stock"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For
                        each=filtered
                        key=|item| (item.id, item.quantity)
                        children=move |item| {
                            let id = item.id.to_string();
                            let (dec_id, inc_id, del_id) = (id.clone(), id.clone(), id);
                            let quantity = item.quantity;
                            view! {
                                <tr>
                                    <td>{item.item_name.clone()}</td>
                                    <td>{item.sku.clone()}</td>
                                    <td>{item.category.clone()}</td>
                                    <td>
                                        <button on:click=move |_| adjust(dec_id.clone(), quantity - 1)>"−"</button>
                                        {quantity}
                                        <button on:click=move |_| adjust(inc_id.clone(), quantity + 1)>"+"</button>
                                    </td>
                                    <td><StockBadge level=item.stock_level() /></td>
                                    <td>
                                        <button class="danger" on:click=move |_| remove(del_id.clone())>"Delete"</button>
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>

            <h2>"Add Item"</h2>
            <div class="add-item">
                <input placeholder="Item name" prop:value=move || new_name.get()
                    on:input=move |ev| set_new_name.set(event_target_value(&ev)) />
                <input placeholder="SKU" prop:value=move || new_sku.get()
                    on:input=move |ev| set_new_sku.set(event_target_value(&ev)) />
                <input placeholder="Type (qr_sticker, nfc_card...)" prop:value=move || new_type.get()
                    on:input=move |ev| set_new_type.set(event_target_value(&ev)) />
                <input placeholder="Category" prop:value=move || new_category.get()
                    on:input=move |ev| set_new_category.set(event_target_value(&ev)) />
                <input type="number" min="0" prop:value=move || new_quantity.get().to_string()
                    on:input=move |ev| set_new_quantity.set(event_target_value(&ev).parse().unwrap_or(0)) />
                <button class="btn btn-primary" on:click=add>"Add"</button>
            </div>
        </div>
    }
}
