//! Main App Component

use leptos::prelude::*;
use leptos_router::{components::*, path};

use crate::pages::{
    AdminPage, DashboardPage, HomePage, InventoryPage, OrderDetailsPage, SubscribePage,
    SuccessPage,
};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <nav class="topbar">
                <a href="/" class="brand">"🚕 EV Taxi"</a>
                <a href="/#pricing">"Pricing"</a>
                <a href="/#faq">"FAQ"</a>
                <a href="/dashboard">"Dashboard"</a>
            </nav>
            <main class="app">
                <Routes fallback=|| view! { <p>"Page not found"</p> }>
                    <Route path=path!("/") view=HomePage />
                    <Route path=path!("/subscribe") view=SubscribePage />
                    <Route path=path!("/success") view=SuccessPage />
                    <Route path=path!("/dashboard") view=DashboardPage />
                    <Route path=path!("/dashboard/orders/:id") view=OrderDetailsPage />
                    <Route path=path!("/admin") view=AdminPage />
                    <Route path=path!("/admin/inventory") view=InventoryPage />
                </Routes>
            </main>
            <footer class="footer">
                <p>"© EV Taxi · support@evtaxi.app"</p>
            </footer>
        </Router>
    }
}
