//! HTTP API
//!
//! Thin axum handlers over the services; every payload is wrapped in
//! `ApiResponse`.

pub mod customers;
pub mod health;
pub mod orders;
pub mod products;

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::db::Database;
use crate::state::AppState;

/// Create the combined router
pub fn create_router<D: Database>(state: AppState<D>) -> Router {
    Router::new()
        .route("/health", get(health::health_check::<D>))
        .merge(customers::router::<D>())
        .merge(products::router::<D>())
        .merge(orders::router::<D>())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
