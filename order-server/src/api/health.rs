//! Health check endpoint

use axum::Json;
use axum::extract::State;
use http::StatusCode;

use crate::db::Database;
use crate::state::AppState;

pub async fn health_check<D: Database>(
    State(state): State<AppState<D>>,
) -> (StatusCode, Json<serde_json::Value>) {
    let (status, db_status) = match state.db.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::warn!(error = %e, "Health check database ping failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    (
        status,
        Json(serde_json::json!({
            "status": if status == StatusCode::OK { "ok" } else { "degraded" },
            "service": "order-server",
            "version": env!("CARGO_PKG_VERSION"),
            "storage": state.db.engine(),
            "database": db_status,
        })),
    )
}
