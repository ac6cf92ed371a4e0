//! Response handling and transformation.
//!
//! # Responsibilities
//! - Relay the upstream response to the client
//! - Add provenance headers on forwarded responses
//! - Map upstream failures to 502 Bad Gateway
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - Hop-by-hop headers stripped automatically
//! - Upstream timeouts use the same 502 path as transport errors

use std::error::Error as _;

use axum::{
    body::{Body, Bytes, HttpBody},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    BoxError,
};

use crate::error::UpstreamError;
use crate::gate::RequiredHeaders;
use crate::upstream::headers::relay_response_headers;

/// Marks a response as having passed the header gate.
pub const X_CUSTOM_HEADERS_VALIDATED: &str = "x-custom-headers-validated";

/// Lists the header names that were validated.
pub const X_VALIDATED_HEADERS: &str = "x-validated-headers";

/// Relay an upstream response, streaming its body and adding provenance headers.
pub fn relay_response<B>(upstream: Response<B>, required: &RequiredHeaders) -> Response
where
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let (parts, body) = upstream.into_parts();
    let mut headers = relay_response_headers(&parts.headers);
    headers.insert(X_CUSTOM_HEADERS_VALIDATED, HeaderValue::from_static("true"));
    headers.insert(X_VALIDATED_HEADERS, required.joined().clone());

    let mut response = Response::new(Body::new(body));
    *response.status_mut() = parts.status;
    *response.headers_mut() = headers;
    response
}

/// 502 response describing why the upstream could not be reached.
pub fn bad_gateway(error: &UpstreamError) -> Response {
    let body = format!("Error proxying to upstream origin: {}", describe(error));
    let mut response = (StatusCode::BAD_GATEWAY, body).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain;charset=UTF-8"),
    );
    response
}

/// Error message followed by its source chain.
fn describe(error: &UpstreamError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
