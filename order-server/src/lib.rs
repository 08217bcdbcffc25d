//! order-server — order management API
//!
//! Customers, products and orders over HTTP. Creating an order reserves
//! product stock inside the same transaction that writes the order;
//! update, delete and cancel give it back according to the order status.

pub mod api;
pub mod config;
pub mod convert;
pub mod db;
pub mod error;
pub mod orders;
pub mod services;
pub mod state;
pub mod utils;

pub use config::{Config, StorageKind};
pub use db::{Database, MemoryDatabase, PgDatabase};
pub use orders::{OrderError, OrderLifecycle};
pub use state::AppState;
