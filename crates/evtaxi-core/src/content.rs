//! Marketing Content
//!
//! Static copy for the landing page sections.

use serde::Serialize;

/// Hero banner copy
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Hero {
    pub headline: &'static str,
    pub highlight: &'static str,
    pub tagline: &'static str,
    pub primary_cta: &'static str,
    pub secondary_cta: &'static str,
}

/// A feature card
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Feature {
    /// Icon name understood by the frontend
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

/// A "How it works" step
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Step {
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

/// A frequently asked question
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

/// Everything the landing page renders besides pricing
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SiteContent {
    pub hero: Hero,
    pub features: &'static [Feature],
    pub steps: &'static [Step],
    pub faqs: &'static [Faq],
}

impl SiteContent {
    pub const fn get() -> Self {
        Self {
            hero: HERO,
            features: FEATURES,
            steps: STEPS,
            faqs: FAQS,
        }
    }
}

pub const HERO: Hero = Hero {
    headline: "Your Own Taxi Booking System.",
    highlight: "Keep 100% of Your Fares!",
    tagline: "QR code and NFC booking for independent EV taxi drivers. No apps to download, no commissions.",
    primary_cta: "Get Started",
    secondary_cta: "Learn More",
};

pub const FEATURES: &[Feature] = &[
    Feature {
        icon: "qr-code",
        title: "Instant QR Code Booking",
        description: "Customers can scan QR codes on your vehicle to book rides instantly - no app download required.",
    },
    Feature {
        icon: "smartphone",
        title: "NFC Tap-to-Book",
        description: "NFC cards in your vehicle allow customers to book with a simple tap of their phone.",
    },
    Feature {
        icon: "calendar",
        title: "Future Bookings",
        description: "Accept advance reservations and build a reliable schedule of regular customers.",
    },
    Feature {
        icon: "wallet",
        title: "Keep 100% of Fares",
        description: "No commission fees. Every dollar your customers pay goes directly to you.",
    },
    Feature {
        icon: "users",
        title: "Build Your Customer Base",
        description: "Create lasting relationships with customers who can book you directly.",
    },
    Feature {
        icon: "settings",
        title: "Complete Control",
        description: "Set your own rates, hours, and service area. You're in complete control of your business.",
    },
];

pub const STEPS: &[Step] = &[
    Step {
        icon: "clipboard-list",
        title: "1. Sign Up",
        description: "Complete our simple registration process and choose your package. No complicated paperwork required.",
    },
    Step {
        icon: "package",
        title: "2. Get Your Kit",
        description: "Receive your custom QR codes, NFC cards, and access to your personal booking system.",
    },
    Step {
        icon: "car",
        title: "3. Start Earning",
        description: "Display your QR codes, accept bookings, and keep 100% of your fares. It's that simple!",
    },
];

pub const FAQS: &[Faq] = &[
    Faq {
        question: "How does the QR code booking system work?",
        answer: "We provide you with custom QR codes to place on your vehicle. When customers scan these codes with their phone camera, they're taken directly to your booking page where they can request a ride immediately or schedule for later - no app download required.",
    },
    Faq {
        question: "Do I need to pay any commission fees?",
        answer: "No! Unlike ride-sharing companies that take 55-75% of your fares, we charge zero commission. You keep 100% of what your customers pay. We only charge a fixed monthly fee for the booking system and support.",
    },
    Faq {
        question: "What's included in the setup fee?",
        answer: "Your setup fee covers custom QR code signs, NFC cards, initial system configuration, and personal onboarding support to get you started. We'll help you set up your rates, service area, and booking preferences.",
    },
    Faq {
        question: "Can customers schedule future rides?",
        answer: "Yes! Customers can book rides in advance, helping you build a reliable schedule of regular customers. Perfect for airport runs, regular commuters, or any planned trips.",
    },
    Faq {
        question: "How do I receive payments from customers?",
        answer: "You can accept cash payments or use our integrated payment processing system to accept credit cards and digital payments. All payments go directly to your account.",
    },
    Faq {
        question: "What kind of support do you provide?",
        answer: "We provide technical support for your booking system, help with customer issues, and guidance on growing your business. Higher tier plans include priority support and business consulting.",
    },
];
