//! Header forwarding policy.
//!
//! # Responsibilities
//! - Copy inbound headers to the upstream request
//! - Strip hop-by-hop headers (configurable on the request side)
//! - Drop hop-by-hop headers from the upstream response before relaying
//!
//! # Design Decisions
//! - `Host` is never forwarded; the client derives it from the origin URL
//! - Headers named in `Connection` are hop-by-hop for that message too
//! - Repeated header values are preserved in order

use axum::http::{header, HeaderMap, HeaderName};

/// Hop-by-hop headers that must not cross the proxy.
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Check if a header is a hop-by-hop header.
pub fn is_hop_by_hop_header(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(&name.as_str())
}

/// Headers to send upstream for an inbound header map.
pub fn forward_request_headers(inbound: &HeaderMap, strip_hop_by_hop: bool) -> HeaderMap {
    let listed = if strip_hop_by_hop {
        connection_tokens(inbound)
    } else {
        Vec::new()
    };

    copy_filtered(inbound, |name| {
        *name == header::HOST
            || (strip_hop_by_hop && (is_hop_by_hop_header(name) || listed.contains(name)))
    })
}

/// Headers to relay back to the client from an upstream response.
pub fn relay_response_headers(upstream: &HeaderMap) -> HeaderMap {
    let listed = connection_tokens(upstream);
    copy_filtered(upstream, |name| {
        is_hop_by_hop_header(name) || listed.contains(name)
    })
}

fn copy_filtered(source: &HeaderMap, skip: impl Fn(&HeaderName) -> bool) -> HeaderMap {
    let mut filtered = HeaderMap::with_capacity(source.len());
    for (name, value) in source {
        if !skip(name) {
            filtered.append(name.clone(), value.clone());
        }
    }
    filtered
}

/// Header names listed in `Connection` values.
fn connection_tokens(headers: &HeaderMap) -> Vec<HeaderName> {
    headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|token| HeaderName::from_bytes(token.trim().as_bytes()).ok())
        .collect()
}
