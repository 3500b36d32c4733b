//! Page Components

mod admin;
mod checkout;
mod dashboard;
mod home;
mod pricing;

pub use admin::{AdminPage, InventoryPage};
pub use checkout::{SubscribePage, SuccessPage};
pub use dashboard::{DashboardPage, OrderDetailsPage};
pub use home::HomePage;
pub use pricing::PricingSection;
