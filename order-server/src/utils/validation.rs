//! Input validation helpers
//!
//! Text length limits follow the column sizes in `migrations/`.

use shared::error::AppError;

use crate::orders::OrderError;

// ── Text length limits ──────────────────────────────────────────────

/// Customer names
pub const MAX_CUSTOMER_NAME_LEN: usize = 100;

/// Cédula / RUC
pub const MAX_TAX_ID_LEN: usize = 20;

pub const MAX_PHONE_LEN: usize = 20;

pub const MAX_ADDRESS_LEN: usize = 255;

/// Product names
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Product business code (SKU)
pub const MAX_PRODUCT_CODE_LEN: usize = 50;

pub const MAX_PAYMENT_METHOD_LEN: usize = 50;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        )));
    }
    Ok(())
}

// ── Validation helpers (Order actions) ──────────────────────────────

/// Payment method must be present and fit its column.
pub fn validate_payment_method(value: &str) -> Result<(), OrderError> {
    validate_required_text(value, "payment_method", MAX_PAYMENT_METHOD_LEN)
        .map_err(|e| OrderError::InvalidPaymentMethod(e.message))
}
