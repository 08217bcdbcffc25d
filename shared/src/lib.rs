//! Shared types for the order-management API
//!
//! Error codes and response envelope, API models, and paging types used
//! by order-server and its clients.

pub mod error;
pub mod models;
pub mod query;
pub mod util;

// Re-exports
pub use axum::Json;
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use query::{PageQuery, PaginatedResponse};
pub use serde::{Deserialize, Serialize};
