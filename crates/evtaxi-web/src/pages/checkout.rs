//! Checkout Return Pages
//!
//! `/subscribe` finishes the split flow after the setup fee is paid;
//! `/success` confirms the subscription.

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::api;

/// Reads `setup_session_id` and forwards to the subscription checkout
#[component]
pub fn SubscribePage() -> impl IntoView {
    let (error, set_error) = signal(None::<String>);
    let setup_session_id = use_query_map().get_untracked().get("setup_session_id");

    leptos::task::spawn_local(async move {
        let result = match setup_session_id {
            Some(id) => match api::create_subscription(&id).await {
                Ok(session) => api::redirect(&session),
                Err(e) => Err(e),
            },
            None => Err("Missing setup session. Please start again from the pricing page.".into()),
        };
        if let Err(e) = result {
            set_error.set(Some(e));
        }
    });

    view! {
        <div class="checkout-status">
            {move || match error.get() {
                None => view! {
                    <h1>"Setup fee received"</h1>
                    <p>"Taking you to your monthly subscription..."</p>
                }
                .into_any(),
                Some(e) => view! {
                    <h1>"Something went wrong"</h1>
                    <p class="error">{e}</p>
                    <a href="/#pricing" class="btn">"Back to pricing"</a>
                }
                .into_any(),
            }}
        </div>
    }
}

#[component]
pub fn SuccessPage() -> impl IntoView {
    let (result, set_result) = signal(None::<Result<api::VerifiedSession, String>>);
    let session_id = use_query_map().get_untracked().get("session_id");

    leptos::task::spawn_local(async move {
        let verified = match session_id {
            Some(id) => api::verify_session(&id).await,
            None => Err("Missing checkout session".into()),
        };
        set_result.set(Some(verified));
    });

    view! {
        <div class="checkout-status">
            {move || match result.get() {
                None => view! { <p>"Confirming your payment..."</p> }.into_any(),
                Some(Err(e)) => view! {
                    <h1>"We could not confirm your payment"</h1>
                    <p class="error">{e}</p>
                    <p>"If you were charged, contact support@evtaxi.app."</p>
                }
                .into_any(),
                Some(Ok(session)) => {
                    let plan = session.plan_name.unwrap_or_else(|| "EV Taxi".into());
                    let paid = session.payment_status.as_deref() == Some("paid");
                    view! {
                        <h1>"Welcome aboard! 🚕"</h1>
                        <p>{format!("Your {plan} plan is active.")}</p>
                        <Show when=move || !paid>
                            <p>"Your payment is still processing. We will email you once it clears."</p>
                        </Show>
                        <p>"Your QR codes and NFC cards ship within 3-5 business days."</p>
                        <a href="/dashboard" class="btn btn-primary">"Go to dashboard"</a>
                    }
                    .into_any()
                }
            }}
        </div>
    }
}
