//! Order detail report

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order::OrderStatus;

/// One printed line of the detail report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReportLine {
    /// Product code, or the product id when the product row is gone
    pub product_code: String,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount: Decimal,
    pub line_subtotal: Decimal,
    pub line_tax: Decimal,
}

/// Order header, customer and lines, ready to print
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReport {
    pub order_id: i64,
    pub customer_id: i64,
    pub customer_name: String,
    pub customer_tax_id: Option<String>,
    pub status: OrderStatus,
    pub payment_method: String,
    pub created_at: i64,
    pub lines: Vec<OrderReportLine>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}
