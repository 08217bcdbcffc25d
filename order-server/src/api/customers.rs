//! Customer API

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use shared::error::{ApiResponse, AppResult};
use shared::models::{Customer, CustomerCreate, CustomerUpdate, Order};

use crate::db::Database;
use crate::state::AppState;

pub fn router<D: Database>() -> Router<AppState<D>> {
    Router::new().nest("/api/customers", customer_routes::<D>())
}

fn customer_routes<D: Database>() -> Router<AppState<D>> {
    Router::new()
        .route("/", get(list::<D>).post(create::<D>))
        .route("/{id}", get(get_by_id::<D>).put(update::<D>).delete(delete::<D>))
        .route("/{id}/orders", get(list_orders::<D>))
}

/// GET /api/customers
pub async fn list<D: Database>(
    State(state): State<AppState<D>>,
) -> AppResult<Json<ApiResponse<Vec<Customer>>>> {
    let customers = state.customers.list().await?;
    Ok(Json(ApiResponse::success(customers)))
}

/// GET /api/customers/{id}
pub async fn get_by_id<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    let customer = state.customers.get(id).await?;
    Ok(Json(ApiResponse::success(customer)))
}

/// POST /api/customers
pub async fn create<D: Database>(
    State(state): State<AppState<D>>,
    Json(payload): Json<CustomerCreate>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    let customer = state.customers.create(payload).await?;
    Ok(Json(ApiResponse::success(customer)))
}

/// PUT /api/customers/{id}
pub async fn update<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<i64>,
    Json(payload): Json<CustomerUpdate>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    let customer = state.customers.update(id, payload).await?;
    Ok(Json(ApiResponse::success(customer)))
}

/// DELETE /api/customers/{id}
pub async fn delete<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.customers.delete(id).await?;
    Ok(Json(ApiResponse::ok()))
}

/// GET /api/customers/{id}/orders
pub async fn list_orders<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let orders = state.orders.list_by_customer(id).await?;
    Ok(Json(ApiResponse::success(orders)))
}
