use crate::models::{RelayMethod, RelayRequest};
use crate::services::RelayError;
use crate::AppState;
use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::header::{AUTHORIZATION, CONTENT_TYPE},
    response::{IntoResponse, Json, Response},
};

/// Mount point of the relay; everything below it is the wildcard path.
pub const PROXY_PREFIX: &str = "/api/proxy/";

pub async fn proxy_get(State(state): State<AppState>, request: Request) -> Response {
    relay(state, RelayMethod::Get, request).await
}

pub async fn proxy_post(State(state): State<AppState>, request: Request) -> Response {
    relay(state, RelayMethod::Post, request).await
}

pub async fn proxy_delete(State(state): State<AppState>, request: Request) -> Response {
    relay(state, RelayMethod::Delete, request).await
}

async fn relay(state: AppState, method: RelayMethod, request: Request) -> Response {
    let relay_request = match into_relay_request(method, request, state.max_body_bytes).await {
        Ok(relay_request) => relay_request,
        Err(e) => {
            tracing::error!(method = %method, error = %e, "Failed to read inbound request");
            return e.into_response();
        }
    };

    match state.backend.relay(relay_request).await {
        Ok(response) => (response.status, Json(response.body)).into_response(),
        Err(e) => {
            tracing::error!(method = %method, error = %e, "Backend proxy error");
            e.into_response()
        }
    }
}

/// Keep only what the relay forwards: path, query, `Authorization`,
/// `Content-Type` and (for POST) the body.
async fn into_relay_request(
    method: RelayMethod,
    request: Request,
    max_body_bytes: usize,
) -> Result<RelayRequest, RelayError> {
    let (parts, body) = request.into_parts();

    let path = parts
        .uri
        .path()
        .strip_prefix(PROXY_PREFIX)
        .unwrap_or_default()
        .to_string();
    let query = parts.uri.query().map(str::to_string);

    let body = if method.carries_body() {
        to_bytes(body, max_body_bytes)
            .await
            .map_err(|e| RelayError::InboundBody(e.to_string()))?
    } else {
        Default::default()
    };

    Ok(RelayRequest {
        method,
        path,
        query,
        authorization: parts.headers.get(AUTHORIZATION).cloned(),
        content_type: parts.headers.get(CONTENT_TYPE).cloned(),
        body,
    })
}
