//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    /// Business code (SKU), unique
    pub code: String,
    pub name: String,
    /// Unit sale price in currency unit
    pub sale_price: Decimal,
    /// Sellable units on hand, never negative
    pub stock: i32,
    /// Whether the product is subject to VAT by default
    pub has_tax: Option<bool>,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub code: String,
    pub name: String,
    pub sale_price: Decimal,
    pub stock: i32,
    pub has_tax: Option<bool>,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub code: Option<String>,
    pub name: Option<String>,
    pub sale_price: Option<Decimal>,
    pub stock: Option<i32>,
    pub has_tax: Option<bool>,
}
