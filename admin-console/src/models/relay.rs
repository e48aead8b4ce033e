use axum::body::Bytes;
use axum::http::{HeaderValue, Method, StatusCode};
use std::fmt;

/// The verbs the relay forwards. Anything else never reaches the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayMethod {
    Get,
    Post,
    Delete,
}

impl RelayMethod {
    /// Only reads keep the inbound query string.
    pub fn keeps_query(self) -> bool {
        matches!(self, RelayMethod::Get)
    }

    /// Only POST forwards a request body.
    pub fn carries_body(self) -> bool {
        matches!(self, RelayMethod::Post)
    }

    pub fn as_method(self) -> Method {
        match self {
            RelayMethod::Get => Method::GET,
            RelayMethod::Post => Method::POST,
            RelayMethod::Delete => Method::DELETE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RelayMethod::Get => "GET",
            RelayMethod::Post => "POST",
            RelayMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for RelayMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inbound request reduced to the parts the relay forwards.
#[derive(Debug, Clone)]
pub struct RelayRequest {
    pub method: RelayMethod,
    /// Wildcard path below the proxy prefix, without a leading slash.
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<HeaderValue>,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Backend status and JSON body, relayed verbatim.
#[derive(Debug, Clone)]
pub struct RelayResponse {
    pub status: StatusCode,
    pub body: serde_json::Value,
}
