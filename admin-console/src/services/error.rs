use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures of the relay itself. Backend error statuses are not errors here;
/// they are relayed verbatim.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned a non-JSON body: {0}")]
    UpstreamBody(#[source] serde_json::Error),

    #[error("invalid request body: {0}")]
    InboundBody(String),
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Transport(_) | RelayError::UpstreamBody(_) => StatusCode::BAD_GATEWAY,
            RelayError::InboundBody(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::Transport(_) => "transport",
            RelayError::UpstreamBody(_) => "upstream_body",
            RelayError::InboundBody(_) => "inbound_body",
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(json!({
                "error": "Backend request failed",
                "detail": self.to_string(),
            })),
        )
            .into_response()
    }
}
