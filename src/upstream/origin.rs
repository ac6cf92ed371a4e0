//! Upstream origin and target URI construction.
//!
//! The inbound request target is never re-parsed: its path and query are
//! reused byte for byte, and only scheme and authority are swapped.

use axum::http::{
    uri::{Authority, PathAndQuery, Scheme},
    Uri,
};
use url::{Position, Url};

use crate::error::UpstreamError;

/// The fixed origin validated requests are sent to.
///
/// Only scheme, host and port are kept. Any path on the configured URL is
/// replaced by the inbound path.
#[derive(Debug, Clone)]
pub struct Origin {
    scheme: Scheme,
    authority: Authority,
}

impl Origin {
    pub fn parse(origin: &str) -> Result<Self, UpstreamError> {
        let invalid = |reason: String| UpstreamError::InvalidOrigin {
            origin: origin.to_string(),
            reason,
        };

        let url = Url::parse(origin).map_err(|e| invalid(e.to_string()))?;
        if url.host_str().is_none() {
            return Err(invalid("missing host".into()));
        }

        let scheme = url
            .scheme()
            .parse::<Scheme>()
            .map_err(|e| invalid(e.to_string()))?;
        let authority = url[Position::BeforeHost..Position::AfterPort]
            .parse::<Authority>()
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self { scheme, authority })
    }

    /// Target URI for an inbound request URI, keeping path and query as sent.
    pub fn target(&self, uri: &Uri) -> Result<Uri, UpstreamError> {
        let path_and_query = uri
            .path_and_query()
            .cloned()
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
            .map_err(UpstreamError::InvalidTarget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(origin: &str, uri: &str) -> String {
        let origin = Origin::parse(origin).unwrap();
        let uri: Uri = uri.parse().unwrap();
        origin.target(&uri).unwrap().to_string()
    }

    #[test]
    fn inbound_path_replaces_origin_path() {
        assert_eq!(
            target("https://jayquake.github.io/custom-headers", "/index.html"),
            "https://jayquake.github.io/index.html"
        );
    }

    #[test]
    fn keeps_explicit_port() {
        assert_eq!(
            target("http://127.0.0.1:3000", "/"),
            "http://127.0.0.1:3000/"
        );
    }

    #[test]
    fn preserves_path_and_query() {
        assert_eq!(
            target("http://127.0.0.1:3000", "/a/b%20c?x=1&y=%2F&x=2"),
            "http://127.0.0.1:3000/a/b%20c?x=1&y=%2F&x=2"
        );
    }

    #[test]
    fn dot_segments_and_raw_characters_untouched() {
        for raw in [
            "/a/../b",
            "/a/./b",
            "/%2e%2e/x",
            "/p?q='x'",
            "/a{b}",
        ] {
            assert_eq!(
                target("http://127.0.0.1:3000", raw),
                format!("http://127.0.0.1:3000{raw}")
            );
        }
    }

    #[test]
    fn keeps_empty_query_marker() {
        assert_eq!(
            target("http://127.0.0.1:3000", "/page?"),
            "http://127.0.0.1:3000/page?"
        );
    }

    #[test]
    fn absolute_form_uses_only_path_and_query() {
        assert_eq!(
            target("http://127.0.0.1:3000", "http://other.example/p?q=1"),
            "http://127.0.0.1:3000/p?q=1"
        );
    }

    #[test]
    fn drops_userinfo_from_origin() {
        assert_eq!(
            target("https://user:pw@example.com:8443/base", "/x"),
            "https://example.com:8443/x"
        );
    }

    #[test]
    fn rejects_hostless_origin() {
        assert!(matches!(
            Origin::parse("unix:/tmp/sock"),
            Err(UpstreamError::InvalidOrigin { .. })
        ));
    }
}
