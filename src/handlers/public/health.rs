// handlers/public/health.rs - GET /health

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::DatabaseManager;

/// Reports `ok` when the process is up and, if a pool is attached, the
/// database answers. A failing database turns the probe into a 503.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let Some(pool) = state.pool.as_ref() else {
        return (StatusCode::OK, Json(json!({ "status": "ok" })));
    };

    match DatabaseManager::health_check(pool).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok", "database": "ok" }))),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": "unavailable" })),
            )
        }
    }
}
