//! Data models
//!
//! API-facing records shared between order-server and its clients.
//! Database rows live in `order-server::db::models` and are converted
//! explicitly; nothing here knows about persistence.

pub mod customer;
pub mod order;
pub mod product;
pub mod report;

// Re-exports
pub use customer::*;
pub use order::*;
pub use product::*;
pub use report::*;
