//! Database entities
//!
//! Rows as the stores read and write them. API records live in
//! `shared::models`; see `crate::convert` for the mapping.

use rust_decimal::Decimal;
use shared::models::OrderStatus;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub tax_id: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_final_consumer: bool,
}

/// Customer row before insert
#[derive(Debug, Clone)]
pub struct CustomerDraft {
    pub name: String,
    pub tax_id: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_final_consumer: bool,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub sale_price: Decimal,
    pub stock: i32,
    pub has_tax: Option<bool>,
}

/// Product row before insert
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub code: String,
    pub name: String,
    pub sale_price: Decimal,
    pub stock: i32,
    pub has_tax: Option<bool>,
}

/// Stored line item with the product's code and name joined in
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub id: i64,
    pub product_id: i64,
    pub product_code: Option<String>,
    pub product_name: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount: Decimal,
    pub has_tax: bool,
}

impl OrderItem {
    pub fn to_draft(&self) -> OrderItemDraft {
        OrderItemDraft {
            product_id: self.product_id,
            quantity: self.quantity,
            unit_price: self.unit_price,
            discount: self.discount,
            has_tax: self.has_tax,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub payment_method: String,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub items: Vec<OrderItem>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Line item to be written
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItemDraft {
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount: Decimal,
    pub has_tax: bool,
}

/// Full order contents to be written, by `create_order` or `update_order`
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub customer_id: i64,
    pub payment_method: String,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub items: Vec<OrderItemDraft>,
    pub created_at: i64,
    pub updated_at: i64,
}
