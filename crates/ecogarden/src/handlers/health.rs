//! Health check endpoints for orchestrators.
//!
//! - `/livez` - Liveness (immediate 200, no checks)
//! - `/healthz` - Storage round-trip

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::state::AppState;

/// GET /livez - Liveness check.
pub async fn livez() -> StatusCode {
    StatusCode::OK
}

/// GET /healthz - Checks that storage answers a lookup.
///
/// Returns 200 when the backend is reachable, 503 otherwise.
pub async fn healthz(State(state): State<AppState>) -> Response {
    match state.user_repo.get_user(Uuid::nil()).await {
        Ok(_) => (StatusCode::OK, Json(serde_json::json!({ "status": "ok" }))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Storage health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "unavailable",
                    "error": e.to_string()
                })),
            )
                .into_response()
        }
    }
}
