//! Database Module
//!
//! Store traits and the unit of work that every service operation runs in.
//! Two engines implement them: PostgreSQL (`postgres`) and an in-process
//! engine (`memory`) used for tests and `STORAGE=memory` runs.

pub mod memory;
pub mod models;
pub mod postgres;

pub use memory::MemoryDatabase;
pub use postgres::PgDatabase;

use async_trait::async_trait;
use shared::models::OrderStatus;
use thiserror::Error;

use models::{Customer, CustomerDraft, Order, OrderDraft, Product, ProductDraft};

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound(err.to_string()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::Duplicate(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err)
                if db_err.is_foreign_key_violation() || db_err.is_check_violation() =>
            {
                RepoError::Validation(db_err.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for RepoError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Orders and their line items.
///
/// Reads return line items in insertion order with product code and name
/// filled in.
#[async_trait]
pub trait OrderStore: Send {
    async fn all_orders(&mut self) -> RepoResult<Vec<Order>>;

    /// Fetch one order; PostgreSQL locks the row for the rest of the unit of work
    async fn order_by_id(&mut self, id: i64) -> RepoResult<Option<Order>>;

    async fn orders_by_customer(&mut self, customer_id: i64) -> RepoResult<Vec<Order>>;

    /// Insert the order and its items, returning the generated id
    async fn create_order(&mut self, draft: &OrderDraft) -> RepoResult<i64>;

    /// Overwrite header fields and replace the item collection
    async fn update_order(&mut self, id: i64, draft: &OrderDraft) -> RepoResult<bool>;

    async fn update_order_status(
        &mut self,
        id: i64,
        status: OrderStatus,
        updated_at: i64,
    ) -> RepoResult<bool>;

    /// Delete the order; items go with it
    async fn delete_order(&mut self, id: i64) -> RepoResult<bool>;
}

/// Products with their stock counters
#[async_trait]
pub trait ProductStore: Send {
    async fn all_products(&mut self) -> RepoResult<Vec<Product>>;

    async fn product_by_id(&mut self, id: i64) -> RepoResult<Option<Product>>;

    /// Like `product_by_id`, but PostgreSQL locks the row so a later
    /// full-row write cannot overwrite a concurrent stock change
    async fn product_for_update(&mut self, id: i64) -> RepoResult<Option<Product>>;

    /// Batch lookup. Missing ids are simply absent from the result;
    /// PostgreSQL locks the returned rows.
    async fn products_by_ids(&mut self, ids: &[i64]) -> RepoResult<Vec<Product>>;

    async fn create_product(&mut self, draft: &ProductDraft) -> RepoResult<Product>;

    async fn update_product(&mut self, product: &Product) -> RepoResult<bool>;

    async fn delete_product(&mut self, id: i64) -> RepoResult<bool>;

    /// Write several products in one statement
    async fn update_products(&mut self, products: &[Product]) -> RepoResult<()>;

    /// One page ordered by id, plus the total row count
    async fn paged_products(&mut self, offset: i64, limit: i64)
    -> RepoResult<(Vec<Product>, i64)>;
}

#[async_trait]
pub trait CustomerStore: Send {
    async fn all_customers(&mut self) -> RepoResult<Vec<Customer>>;

    async fn customer_by_id(&mut self, id: i64) -> RepoResult<Option<Customer>>;

    async fn create_customer(&mut self, draft: &CustomerDraft) -> RepoResult<Customer>;

    async fn update_customer(&mut self, customer: &Customer) -> RepoResult<bool>;

    async fn delete_customer(&mut self, id: i64) -> RepoResult<bool>;
}

/// One transaction across all stores.
///
/// Dropping without `commit` discards every change.
#[async_trait]
pub trait UnitOfWork: OrderStore + ProductStore + CustomerStore + Send {
    async fn commit(self) -> RepoResult<()>;

    async fn rollback(self) -> RepoResult<()>;
}

/// A storage engine that hands out units of work
#[async_trait]
pub trait Database: Clone + Send + Sync + 'static {
    type Tx: UnitOfWork;

    async fn begin(&self) -> RepoResult<Self::Tx>;

    /// Connectivity check for the health endpoint
    async fn ping(&self) -> RepoResult<()>;

    /// Engine name for logs and health output
    fn engine(&self) -> &'static str;
}
