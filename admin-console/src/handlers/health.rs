use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

/// Relay the backend root; any failure reports the backend as offline.
pub async fn backend_health(State(state): State<AppState>) -> Response {
    match state.backend.health().await {
        Ok(response) => (response.status, Json(response.body)).into_response(),
        Err(e) => {
            tracing::warn!(backend = %state.backend.base_url(), error = %e, "Backend offline");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": "Backend offline" })),
            )
                .into_response()
        }
    }
}

/// Liveness of the relay process itself; never touches the backend.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "admin-console",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
