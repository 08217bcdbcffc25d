//! Order API

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use shared::error::{ApiResponse, AppResult};
use shared::models::{Order, OrderCreate, OrderReport, OrderStatusChange, OrderUpdate};

use crate::db::Database;
use crate::orders::report::OrderReportRenderer;
use crate::state::AppState;

pub fn router<D: Database>() -> Router<AppState<D>> {
    Router::new().nest("/api/orders", order_routes::<D>())
}

fn order_routes<D: Database>() -> Router<AppState<D>> {
    Router::new()
        .route("/", get(list::<D>).post(create::<D>))
        .route("/{id}", get(get_by_id::<D>).put(update::<D>).delete(delete::<D>))
        .route("/{id}/status", put(change_status::<D>))
        .route("/{id}/cancel", post(cancel::<D>))
        .route("/{id}/complete", post(complete::<D>))
        .route("/{id}/report", get(report::<D>))
        .route("/{id}/report/text", get(report_text::<D>))
}

/// GET /api/orders
pub async fn list<D: Database>(
    State(state): State<AppState<D>>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let orders = state.orders.list().await?;
    Ok(Json(ApiResponse::success(orders)))
}

/// GET /api/orders/{id}
pub async fn get_by_id<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.get(id).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// POST /api/orders - reserve stock and create a pending order
pub async fn create<D: Database>(
    State(state): State<AppState<D>>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.create(payload).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// PUT /api/orders/{id}
pub async fn update<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.update(id, payload).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// DELETE /api/orders/{id}
pub async fn delete<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.orders.delete(id).await?;
    Ok(Json(ApiResponse::ok()))
}

/// PUT /api/orders/{id}/status
pub async fn change_status<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusChange>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.change_status(id, &payload.status).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// POST /api/orders/{id}/cancel
pub async fn cancel<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.cancel(id).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// POST /api/orders/{id}/complete
pub async fn complete<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.complete(id).await?;
    Ok(Json(ApiResponse::success(order)))
}

/// GET /api/orders/{id}/report
pub async fn report<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<OrderReport>>> {
    let report = state.orders.report(id).await?;
    Ok(Json(ApiResponse::success(report)))
}

/// GET /api/orders/{id}/report/text - printable detail as a download
pub async fn report_text<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let report = state.orders.report(id).await?;
    let text = OrderReportRenderer::default().render(&report);

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"order_{id}.txt\""),
            ),
        ],
        text,
    ))
}
