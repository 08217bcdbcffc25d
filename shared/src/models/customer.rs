//! Customer Model

use serde::{Deserialize, Serialize};

/// Customer entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    /// National id / tax registration number (cédula or RUC)
    pub tax_id: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Anonymous "final consumer" billing identity
    pub is_final_consumer: bool,
}

/// Create customer payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerCreate {
    pub name: String,
    pub tax_id: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_final_consumer: Option<bool>,
}

/// Update customer payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub tax_id: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_final_consumer: Option<bool>,
}
