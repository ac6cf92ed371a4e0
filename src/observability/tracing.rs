//! Request spans.
//!
//! Every inbound request gets a span carrying a fresh UUID v4 request ID,
//! so the gate decision and upstream logs for one request can be correlated.
//! The ID lives only in the span; headers are not modified.

use axum::{body::Body, http::Request};
use tracing::Span;
use uuid::Uuid;

/// Span factory for `tower_http::trace::TraceLayer::make_span_with`.
pub fn make_request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %request.method(),
        uri = %request.uri(),
        version = ?request.version(),
    )
}
