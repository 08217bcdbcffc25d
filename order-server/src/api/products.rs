//! Product API

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use shared::error::{ApiResponse, AppResult};
use shared::models::{Product, ProductCreate, ProductUpdate};
use shared::query::PageQuery;

use crate::db::Database;
use crate::state::AppState;

pub fn router<D: Database>() -> Router<AppState<D>> {
    Router::new().nest("/api/products", product_routes::<D>())
}

fn product_routes<D: Database>() -> Router<AppState<D>> {
    Router::new()
        .route("/", get(list::<D>).post(create::<D>))
        .route("/{id}", get(get_by_id::<D>).put(update::<D>).delete(delete::<D>))
}

/// GET /api/products - full list, or one page when `page` / `page_size` is given
pub async fn list<D: Database>(
    State(state): State<AppState<D>>,
    Query(query): Query<PageQuery>,
) -> AppResult<Response> {
    if query.is_paged() {
        let page = state.products.list_paged(query).await?;
        return Ok(Json(ApiResponse::success(page)).into_response());
    }
    let products = state.products.list().await?;
    Ok(Json(ApiResponse::success(products)).into_response())
}

/// GET /api/products/{id}
pub async fn get_by_id<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = state.products.get(id).await?;
    Ok(Json(ApiResponse::success(product)))
}

/// POST /api/products
pub async fn create<D: Database>(
    State(state): State<AppState<D>>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = state.products.create(payload).await?;
    Ok(Json(ApiResponse::success(product)))
}

/// PUT /api/products/{id}
pub async fn update<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = state.products.update(id, payload).await?;
    Ok(Json(ApiResponse::success(product)))
}

/// DELETE /api/products/{id}
pub async fn delete<D: Database>(
    State(state): State<AppState<D>>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.products.delete(id).await?;
    Ok(Json(ApiResponse::ok()))
}
