//! Error types for the gatekeeper.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::config::validation::ValidationError;
use crate::gate::RequiredHeadersError;

/// Failure to obtain a response head from the upstream origin.
///
/// Every variant is answered with 502 Bad Gateway; none are retried.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("invalid upstream origin `{origin}`: {reason}")]
    InvalidOrigin { origin: String, reason: String },

    #[error("cannot build upstream URI: {0}")]
    InvalidTarget(#[source] axum::http::Error),

    #[error("upstream redirected to unusable location `{0}`")]
    InvalidRedirect(String),

    #[error("upstream redirected more than {0} times")]
    TooManyRedirects(usize),
}

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// Error assembling or running the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid required header set: {0}")]
    Gate(#[from] RequiredHeadersError),

    #[error("cannot build upstream client: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("TLS setup failed: {0}")]
    Tls(#[source] std::io::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
