//! # evtaxi-store
//!
//! Data access for the customer and admin dashboards.
//!
//! ## Backends
//!
//! - **Supabase** (default): the hosted `orders`, `order_items`, `profiles`
//!   and `inventory` tables over PostgREST
//! - **Memory**: in-process tables for tests and local development
//!
//! ## Usage
//!
//! ```rust,ignore
//! use evtaxi_store::{DashboardStore, SupabaseStore};
//!
//! let store = SupabaseStore::from_env()?;
//! let orders = store.list_orders(user_id).await?;
//! ```

mod error;
mod memory;
mod store;

#[cfg(feature = "supabase")]
pub mod supabase;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use store::{DashboardStore, tables, validate_new_item, validate_quantity};

#[cfg(feature = "supabase")]
pub use supabase::{SupabaseConfig, SupabaseStore};
