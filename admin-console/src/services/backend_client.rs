use crate::config::BackendSettings;
use crate::models::{RelayMethod, RelayRequest, RelayResponse};
use crate::services::encoding::BodyEncoding;
use crate::services::error::RelayError;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use metrics::counter;
use reqwest::Client;
use service_core::observability::TracedClientExt;

/// Versioned API prefix every relayed path is mounted under.
pub const API_PREFIX: &str = "/api/v1/";

/// HTTP client for the RAG backend. Holds no per-request state.
pub struct BackendClient {
    client: Client,
    settings: BackendSettings,
}

impl BackendClient {
    pub fn new(settings: BackendSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub fn base_url(&self) -> &str {
        self.settings.origin()
    }

    /// `{origin}/api/v1/{path}`, plus `?{query}` for GET when present.
    pub fn target_url(&self, method: RelayMethod, path: &str, query: Option<&str>) -> String {
        let mut url = format!(
            "{}{}{}",
            self.base_url(),
            API_PREFIX,
            path.trim_start_matches('/')
        );

        if method.keeps_query() {
            if let Some(query) = query.filter(|q| !q.is_empty()) {
                url.push('?');
                url.push_str(query);
            }
        }

        url
    }

    /// Forward one request and return the backend's status and JSON body.
    pub async fn relay(&self, request: RelayRequest) -> Result<RelayResponse, RelayError> {
        let url = self.target_url(request.method, &request.path, request.query.as_deref());
        let method = request.method;

        let result = self.forward(&url, request).await;

        let outcome = match &result {
            Ok(_) => "relayed",
            Err(e) => e.kind(),
        };
        counter!("relay_requests_total", "method" => method.as_str(), "outcome" => outcome)
            .increment(1);

        result
    }

    async fn forward(&self, url: &str, request: RelayRequest) -> Result<RelayResponse, RelayError> {
        let mut outbound = self
            .client
            .traced_request(request.method.as_method(), url);

        if let Some(authorization) = request.authorization {
            outbound = outbound.header(AUTHORIZATION, authorization);
        }

        if request.method.carries_body() {
            let content_type = request
                .content_type
                .as_ref()
                .and_then(|value| value.to_str().ok());
            let encoding = BodyEncoding::from_content_type(content_type);
            let body = encoding.encode(request.content_type.as_ref(), request.body)?;

            tracing::debug!(?encoding, bytes = body.bytes.len(), "Encoded outbound body");

            outbound = outbound
                .header(CONTENT_TYPE, body.content_type)
                .body(body.bytes);
        }

        let response = outbound.send().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Backend request failed");
            RelayError::Transport(e)
        })?;

        tracing::info!(
            method = %request.method,
            url = %url,
            status = response.status().as_u16(),
            "Relayed request"
        );

        read_json(response, EmptyBody::Null).await
    }

    /// GET the backend root. An empty body counts as undecodable here.
    pub async fn health(&self) -> Result<RelayResponse, RelayError> {
        let url = format!("{}/", self.base_url());

        let response = self.client.traced_get(&url).send().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Backend health check failed");
            RelayError::Transport(e)
        })?;

        read_json(response, EmptyBody::Reject).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmptyBody {
    Null,
    Reject,
}

/// Decode the backend body. Object keys keep the backend's order.
async fn read_json(
    response: reqwest::Response,
    empty: EmptyBody,
) -> Result<RelayResponse, RelayError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    let body = if bytes.is_empty() && empty == EmptyBody::Null {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!(status = status.as_u16(), error = %e, "Backend returned non-JSON body");
            RelayError::UpstreamBody(e)
        })?
    };

    Ok(RelayResponse { status, body })
}
