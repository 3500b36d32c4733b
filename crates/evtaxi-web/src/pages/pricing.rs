//! Pricing Section

use evtaxi_core::PricedPlan;
use leptos::prelude::*;

use crate::api;
use crate::components::PlanCard;

#[component]
pub fn PricingSection() -> impl IntoView {
    let (plans, set_plans) = signal(None::<Result<Vec<PricedPlan>, String>>);

    leptos::task::spawn_local(async move {
        set_plans.set(Some(api::fetch_plans().await));
    });

    view! {
        <section id="pricing" class="pricing">
            <h2>"Simple, Transparent Pricing"</h2>
            <p class="subtitle">"One-time setup, low monthly fee, zero commissions"</p>

            <div class="plans">
                {move || match plans.get() {
                    None => view! { <p>"Loading plans..."</p> }.into_any(),
                    Some(Err(e)) => view! { <p class="error">{e}</p> }.into_any(),
                    Some(Ok(plans)) => plans
                        .into_iter()
                        .map(|plan| view! { <PlanCard plan=plan /> })
                        .collect_view()
                        .into_any(),
                }}
            </div>
        </section>
    }
}
