//! Redirect following for upstream responses.
//!
//! # Design Decisions
//! - 303, and 301/302 answering a POST, continue as a bodiless GET
//! - Other redirects repeat the request unchanged, which is only possible
//!   when the request had no body; a streamed body cannot be sent twice,
//!   so such redirects are relayed to the client instead
//! - Credentials are dropped when a redirect leaves the origin

use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use url::{Position, Url};

use crate::error::UpstreamError;

/// Headers describing a request body, dropped when switching to GET.
const BODY_HEADERS: &[&str] = &[
    "content-type",
    "content-length",
    "content-encoding",
    "content-language",
    "content-location",
    "transfer-encoding",
];

/// Headers never sent to a different origin after a redirect.
const CREDENTIAL_HEADERS: &[&str] = &[
    "authorization",
    "cookie",
    "proxy-authorization",
    "www-authenticate",
];

/// How the next request in a redirect chain is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextHop {
    /// Same method and headers, empty body.
    Repeat,
    /// GET without a body or body headers.
    SwitchToGet,
}

/// Whether a response with `status` is followed, and how.
///
/// `replayable` is true when the original request carried no body.
pub fn next_hop(status: StatusCode, method: &Method, replayable: bool) -> Option<NextHop> {
    match status {
        StatusCode::SEE_OTHER if *method != Method::GET && *method != Method::HEAD => {
            Some(NextHop::SwitchToGet)
        }
        StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND if *method == Method::POST => {
            Some(NextHop::SwitchToGet)
        }
        StatusCode::MOVED_PERMANENTLY
        | StatusCode::FOUND
        | StatusCode::SEE_OTHER
        | StatusCode::TEMPORARY_REDIRECT
        | StatusCode::PERMANENT_REDIRECT
            if replayable =>
        {
            Some(NextHop::Repeat)
        }
        _ => None,
    }
}

/// Resolve a `Location` value against the URI that returned it.
pub fn resolve_location(current: &Uri, location: &HeaderValue) -> Result<Uri, UpstreamError> {
    let raw = String::from_utf8_lossy(location.as_bytes()).into_owned();
    let invalid = || UpstreamError::InvalidRedirect(raw.clone());

    let base = Url::parse(&current.to_string()).map_err(|_| invalid())?;
    let next = base.join(&raw).map_err(|_| invalid())?;
    if !matches!(next.scheme(), "http" | "https") {
        return Err(invalid());
    }

    next[..Position::AfterQuery].parse::<Uri>().map_err(|_| invalid())
}

/// Request headers for the next hop.
pub fn next_headers(headers: &HeaderMap, hop: NextHop, current: &Uri, next: &Uri) -> HeaderMap {
    let mut headers = headers.clone();

    if hop == NextHop::SwitchToGet {
        for name in BODY_HEADERS {
            headers.remove(*name);
        }
    }

    if current.scheme() != next.scheme() || current.authority() != next.authority() {
        for name in CREDENTIAL_HEADERS {
            headers.remove(*name);
        }
    }

    headers
}
