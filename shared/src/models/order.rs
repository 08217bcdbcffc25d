//! Order Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Order status
///
/// Stock is consumed when an order is created, so every status except
/// `Cancelled` represents inventory that has left the shelf.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// Storage / wire representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Only pending orders may have their lines, payment method or discount edited
    pub const fn is_mutable(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    /// Completed and cancelled orders never change status again
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a status string is not one of the known statuses
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized order status: {0}")]
pub struct UnknownOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    /// Case-insensitive; also accepts the Spanish names used by older clients
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" | "PENDIENTE" => Ok(OrderStatus::Pending),
            "PROCESSING" | "PROCESANDO" | "EN_PROCESO" => Ok(OrderStatus::Processing),
            "COMPLETED" | "COMPLETADO" => Ok(OrderStatus::Completed),
            "CANCELLED" | "CANCELED" | "CANCELADO" => Ok(OrderStatus::Cancelled),
            _ => Err(UnknownOrderStatus(s.to_string())),
        }
    }
}

/// Order line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub product_id: i64,
    pub product_code: Option<String>,
    pub product_name: Option<String>,
    pub quantity: i32,
    /// Price captured when the line was created, in currency unit
    pub unit_price: Decimal,
    /// Line discount amount in currency unit
    pub discount: Decimal,
    pub has_tax: bool,
    /// quantity × unit_price − discount
    pub line_subtotal: Decimal,
    /// VAT for this line (0 when `has_tax` is false)
    pub line_tax: Decimal,
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub payment_method: String,
    pub status: OrderStatus,
    pub subtotal: Decimal,
    pub tax: Decimal,
    /// Order-level discount amount in currency unit
    pub discount: Decimal,
    pub total: Decimal,
    pub items: Vec<OrderItem>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Requested line for create / update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: i64,
    pub quantity: i32,
    #[serde(default)]
    pub discount: Option<Decimal>,
    /// Falls back to the product's own tax flag
    #[serde(default)]
    pub has_tax: Option<bool>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub customer_id: i64,
    pub payment_method: String,
    /// Order-level discount (defaults to 0)
    #[serde(default)]
    pub discount: Option<Decimal>,
    pub items: Vec<OrderLine>,
}

/// Update order payload
///
/// `items: None` keeps the current lines; `Some(lines)` replaces them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    #[serde(default)]
    pub items: Option<Vec<OrderLine>>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub discount: Option<Decimal>,
}

/// Status change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusChange {
    pub status: String,
}
