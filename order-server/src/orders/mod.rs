//! Orders Module
//!
//! - `lifecycle`: create / update / delete / status changes with stock reservation
//! - `money`: decimal totals
//! - `report`: printable order detail
//! - `status`: allowed status transitions
//! - `stock`: in-memory stock ledger for one operation

pub mod error;
pub mod lifecycle;
pub mod money;
pub mod report;
pub mod status;
pub mod stock;

pub use error::{OrderError, OrderResult, Resource};
pub use lifecycle::OrderLifecycle;
