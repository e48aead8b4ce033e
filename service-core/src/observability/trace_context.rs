//! W3C Trace Context propagation for outbound backend calls.
//!
//! Requests built through [`TracedClientExt`] carry `traceparent` (and
//! `tracestate` when non-empty) for the current span. Without an active
//! OpenTelemetry span nothing is added, so relayed requests stay limited to
//! the headers the caller set.
//!
//! See: https://www.w3.org/TR/trace-context/

use opentelemetry::trace::{SpanContext, TraceContextExt};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub const TRACEPARENT_HEADER: &str = "traceparent";
pub const TRACESTATE_HEADER: &str = "tracestate";

/// Format `version-trace_id-span_id-flags`. Invalid contexts yield `None`.
pub fn traceparent(span_context: &SpanContext) -> Option<String> {
    if !span_context.is_valid() {
        return None;
    }

    Some(format!(
        "00-{}-{}-{:02x}",
        span_context.trace_id(),
        span_context.span_id(),
        span_context.trace_flags().to_u8()
    ))
}

/// Add trace headers for the current span to `headers`.
pub fn inject_trace_context(headers: &mut HeaderMap) {
    let context = Span::current().context();
    let otel_span = context.span();
    let span_context = otel_span.span_context();

    let Some(parent) = traceparent(span_context) else {
        return;
    };
    if let Ok(value) = HeaderValue::from_str(&parent) {
        headers.insert(TRACEPARENT_HEADER, value);
    }

    let state = span_context.trace_state().header();
    if !state.is_empty()
        && let Ok(value) = HeaderValue::from_str(&state)
    {
        headers.insert(TRACESTATE_HEADER, value);
    }
}

/// Wraps a `reqwest::RequestBuilder`; trace headers are resolved at send
/// time so they belong to the span that actually sends.
pub struct TracedRequest {
    inner: reqwest::RequestBuilder,
}

impl TracedRequest {
    pub fn new(inner: reqwest::RequestBuilder) -> Self {
        Self { inner }
    }

    pub fn header(mut self, key: HeaderName, value: HeaderValue) -> Self {
        self.inner = self.inner.header(key, value);
        self
    }

    pub fn body<B: Into<reqwest::Body>>(mut self, body: B) -> Self {
        self.inner = self.inner.body(body);
        self
    }

    pub async fn send(self) -> Result<reqwest::Response, reqwest::Error> {
        let mut trace_headers = HeaderMap::new();
        inject_trace_context(&mut trace_headers);

        self.inner.headers(trace_headers).send().await
    }
}

pub trait TracedClientExt {
    fn traced_request(&self, method: reqwest::Method, url: &str) -> TracedRequest;

    fn traced_get(&self, url: &str) -> TracedRequest {
        self.traced_request(reqwest::Method::GET, url)
    }
}

impl TracedClientExt for reqwest::Client {
    fn traced_request(&self, method: reqwest::Method, url: &str) -> TracedRequest {
        TracedRequest::new(self.request(method, url))
    }
}
