use std::fmt;

use shared::error::{AppError, ErrorCode};
use shared::models::OrderStatus;
use thiserror::Error;

use crate::db::RepoError;

/// Entity kinds that can be missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Order,
    Product,
    Customer,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::Order => "Order",
            Resource::Product => "Product",
            Resource::Customer => "Customer",
        })
    }
}

/// Order lifecycle errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("{resource} {id} not found")]
    NotFound { resource: Resource, id: i64 },

    #[error(
        "Insufficient stock for product {product_id} ({product_name}): requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: i64,
        product_name: String,
        requested: i64,
        available: i32,
    },

    #[error("Order {order_id} is {status}: cannot {operation}")]
    InvalidState {
        order_id: i64,
        status: OrderStatus,
        operation: String,
    },

    #[error("Invalid order status: {0}")]
    InvalidTransition(String),

    #[error("Order must contain at least one item")]
    EmptyOrder,

    #[error("Quantity must be positive, got {quantity} for product {product_id}")]
    InvalidQuantity { product_id: i64, quantity: i32 },

    #[error("Invalid payment method: {0}")]
    InvalidPaymentMethod(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl OrderError {
    pub fn not_found(resource: Resource, id: i64) -> Self {
        OrderError::NotFound { resource, id }
    }

    pub fn invalid_state(order_id: i64, status: OrderStatus, operation: impl Into<String>) -> Self {
        OrderError::InvalidState {
            order_id,
            status,
            operation: operation.into(),
        }
    }
}

pub type OrderResult<T> = Result<T, OrderError>;

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let message = err.to_string();
        match err {
            OrderError::NotFound { resource, id } => {
                let code = match resource {
                    Resource::Order => ErrorCode::OrderNotFound,
                    Resource::Product => ErrorCode::ProductNotFound,
                    Resource::Customer => ErrorCode::CustomerNotFound,
                };
                AppError::with_message(code, message).with_detail("id", id)
            }
            OrderError::InsufficientStock {
                product_id,
                requested,
                available,
                ..
            } => AppError::with_message(ErrorCode::ProductOutOfStock, message)
                .with_detail("product_id", product_id)
                .with_detail("requested", requested)
                .with_detail("available", available),
            OrderError::InvalidState {
                order_id, status, ..
            } => AppError::with_message(ErrorCode::OrderInvalidState, message)
                .with_detail("order_id", order_id)
                .with_detail("status", status.as_str()),
            OrderError::InvalidTransition(status) => {
                AppError::with_message(ErrorCode::OrderInvalidStatus, message)
                    .with_detail("status", status)
            }
            OrderError::EmptyOrder => AppError::with_message(ErrorCode::OrderEmpty, message),
            OrderError::InvalidQuantity {
                product_id,
                quantity,
            } => AppError::with_message(ErrorCode::OrderItemInvalidQuantity, message)
                .with_detail("product_id", product_id)
                .with_detail("quantity", quantity),
            OrderError::InvalidPaymentMethod(_) => {
                AppError::with_message(ErrorCode::PaymentInvalidMethod, message)
            }
            OrderError::Validation(_) => AppError::with_message(ErrorCode::ValidationFailed, message),
            OrderError::Repo(RepoError::Validation(msg)) => AppError::validation(msg),
            OrderError::Repo(e) => {
                tracing::error!(error = %e, "Order repository error");
                AppError::database(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_not_found_maps_per_resource() {
        let err: AppError = OrderError::not_found(Resource::Product, 7).into();
        assert_eq!(err.code, ErrorCode::ProductNotFound);
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Product 7 not found");

        let err: AppError = OrderError::not_found(Resource::Customer, 1).into();
        assert_eq!(err.code, ErrorCode::CustomerNotFound);
    }

    #[test]
    fn test_insufficient_stock_carries_details() {
        let err: AppError = OrderError::InsufficientStock {
            product_id: 3,
            product_name: "Cola".into(),
            requested: 5,
            available: 2,
        }
        .into();
        assert_eq!(err.code, ErrorCode::ProductOutOfStock);
        assert_eq!(err.http_status(), StatusCode::CONFLICT);
        let details = err.details.unwrap();
        assert_eq!(details["requested"], 5);
        assert_eq!(details["available"], 2);
    }

    #[test]
    fn test_invalid_state_is_conflict() {
        let err: AppError =
            OrderError::invalid_state(1, OrderStatus::Completed, "update").into();
        assert_eq!(err.code, ErrorCode::OrderInvalidState);
        assert_eq!(err.http_status(), StatusCode::CONFLICT);
        assert_eq!(err.message, "Order 1 is COMPLETED: cannot update");
    }

    #[test]
    fn test_invalid_transition_is_bad_request() {
        let err: AppError = OrderError::InvalidTransition("Shipped".into()).into();
        assert_eq!(err.code, ErrorCode::OrderInvalidStatus);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_line_errors_have_own_codes() {
        let err: AppError = OrderError::EmptyOrder.into();
        assert_eq!(err.code, ErrorCode::OrderEmpty);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);

        let err: AppError = OrderError::InvalidQuantity {
            product_id: 4,
            quantity: 0,
        }
        .into();
        assert_eq!(err.code, ErrorCode::OrderItemInvalidQuantity);
        assert_eq!(err.details.unwrap()["quantity"], 0);

        let err: AppError = OrderError::InvalidPaymentMethod("payment_method must not be empty".into()).into();
        assert_eq!(err.code, ErrorCode::PaymentInvalidMethod);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_repo_database_error_is_internal() {
        let err: AppError = OrderError::Repo(RepoError::Database("boom".into())).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
