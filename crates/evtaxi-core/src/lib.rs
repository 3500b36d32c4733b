//! # evtaxi-core
//!
//! Shared types for the EV Taxi booking-kit site: the plan catalog shown on
//! the pricing page, the static marketing copy, and the row types of the
//! hosted dashboard tables.
//!
//! This crate has no I/O so it compiles for both the server and the WASM
//! frontend.

pub mod catalog;
pub mod content;
pub mod model;

pub use catalog::{Plan, PlanId, PlanPrices, PricedPlan, format_usd};
pub use content::SiteContent;
pub use model::{
    AdminStats, CustomerSummary, InventoryFilter, InventoryItem, NewInventoryItem, Order,
    OrderDetails, OrderItem, Profile, Shipment, ShippingAddress, StockLevel,
};
