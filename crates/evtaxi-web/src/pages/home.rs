//! Home Page
//!
//! Hero, features, how-it-works, pricing and FAQ sections.

use evtaxi_core::SiteContent;
use leptos::prelude::*;

use crate::pages::PricingSection;

/// Emoji for the icon names used in the site copy
fn icon(name: &str) -> &'static str {
    match name {
        "qr-code" => "🔳",
        "smartphone" => "📱",
        "calendar" => "📅",
        "wallet" => "💰",
        "users" => "👥",
        "settings" => "⚙️",
        "clipboard-list" => "📋",
        "package" => "📦",
        "car" => "🚕",
        _ => "•",
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let content = SiteContent::get();
    let hero = content.hero;

    view! {
        <div class="home">
            <header class="hero">
                <h1>{hero.headline}<br /><span class="highlight">{hero.highlight}</span></h1>
                <p class="tagline">{hero.tagline}</p>
                <div class="cta">
                    <a href="#pricing" class="btn btn-primary">{hero.primary_cta}</a>
                    <a href="#how-it-works" class="btn">{hero.secondary_cta}</a>
                </div>
            </header>

            <section id="features" class="features">
                {content
                    .features
                    .iter()
                    .map(|f| view! {
                        <div class="feature">
                            <span class="icon">{icon(f.icon)}</span>
                            <h3>{f.title}</h3>
                            <p>{f.description}</p>
                        </div>
                    })
                    .collect_view()}
            </section>

            <section id="how-it-works" class="steps">
                <h2>"How It Works"</h2>
                {content
                    .steps
                    .iter()
                    .enumerate()
                    .map(|(i, s)| view! {
                        <div class="step">
                            <span class="step-number">{i + 1}</span>
                            <span class="icon">{icon(s.icon)}</span>
                            <h3>{s.title}</h3>
                            <p>{s.description}</p>
                        </div>
                    })
                    .collect_view()}
            </section>

            <PricingSection />

            <section id="faq" class="faq">
                <h2>"Frequently Asked Questions"</h2>
                {content
                    .faqs
                    .iter()
                    .map(|faq| view! {
                        <details class="faq-item">
                            <summary>{faq.question}</summary>
                            <p>{faq.answer}</p>
                        </details>
                    })
                    .collect_view()}
            </section>
        </div>
    }
}
