//! Catalog services
//!
//! Product and customer CRUD. Orders go through `crate::orders::OrderLifecycle`.

pub mod customer;
pub mod product;

pub use customer::CustomerService;
pub use product::ProductService;
