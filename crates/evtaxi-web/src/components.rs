//! UI Components

use evtaxi_core::{PricedPlan, StockLevel, format_usd};
use leptos::prelude::*;

use crate::api;

/// Pricing card with its checkout button
#[component]
pub fn PlanCard(plan: PricedPlan) -> impl IntoView {
    let (error, set_error) = signal(None::<String>);
    let (busy, set_busy) = signal(false);

    let class = if plan.plan.popular { "plan featured" } else { "plan" };
    let title = plan.plan.name.clone();
    let setup = format_usd(plan.plan.setup_fee);
    let monthly = format_usd(plan.plan.monthly_fee);
    let features = plan.plan.features.clone();
    let popular = plan.plan.popular;

    let checkout = move |_| {
        let plan = plan.clone();
        set_busy.set(true);
        set_error.set(None);
        leptos::task::spawn_local(async move {
            let result = match api::start_checkout(&plan).await {
                Ok(session) => api::redirect(&session),
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                set_error.set(Some(e));
                set_busy.set(false);
            }
        });
    };

    view! {
        <div class=class>
            <Show when=move || popular>
                <span class="badge">"Most Popular"</span>
            </Show>
            <h3>{title}</h3>
            <div class="price">{setup}<span>" setup"</span></div>
            <div class="price monthly">{monthly}<span>"/month"</span></div>
            <ul>
                {features.into_iter().map(|f| view! { <li>{f}</li> }).collect_view()}
            </ul>
            <button class="btn btn-primary" on:click=checkout disabled=move || busy.get()>
                {move || if busy.get() { "Redirecting..." } else { "Get Started" }}
            </button>
            <ErrorBanner error=error />
        </div>
    }
}

#[component]
pub fn ErrorBanner(error: ReadSignal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || error.get().is_some()>
            <p class="error">{move || error.get().unwrap_or_default()}</p>
        </Show>
    }
}

#[component]
pub fn StockBadge(level: StockLevel) -> impl IntoView {
    let (class, label) = match level {
        StockLevel::InStock => ("badge stock-ok", "In stock"),
        StockLevel::Low => ("badge stock-low", "Low stock"),
        StockLevel::Out => ("badge stock-out", "Out of stock"),
    };
    view! { <span class=class>{label}</span> }
}

#[component]
pub fn StatCard(label: &'static str, value: String) -> impl IntoView {
    view! {
        <div class="stat">
            <span class="stat-label">{label}</span>
            <span class="stat-value">{value}</span>
        </div>
    }
}
