//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the upstream origin is a usable absolute URL
//! - Check required header names are valid and unique
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatekeeperConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatekeeperConfig;
use crate::gate::{RequiredHeaders, RequiredHeadersError};

/// A single failed semantic check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("listener.tls.{0} must not be empty")]
    TlsPath(&'static str),

    #[error("upstream.origin `{origin}` is invalid: {reason}")]
    Origin { origin: String, reason: String },

    #[error("upstream.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("gate.required_headers: {0}")]
    RequiredHeaders(#[from] RequiredHeadersError),

    #[error("observability.metrics_address `{0}` is not a socket address")]
    MetricsAddress(String),
}

/// Validate a parsed configuration, collecting every failure.
pub fn validate_config(config: &GatekeeperConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.trim().is_empty() {
            errors.push(ValidationError::TlsPath("cert_path"));
        }
        if tls.key_path.trim().is_empty() {
            errors.push(ValidationError::TlsPath("key_path"));
        }
    }

    if let Err(reason) = check_origin(&config.upstream.origin) {
        errors.push(ValidationError::Origin {
            origin: config.upstream.origin.clone(),
            reason,
        });
    }

    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeout_secs"));
    }
    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_timeout_secs"));
    }

    if let Err(e) = RequiredHeaders::new(&config.gate.required_headers) {
        errors.push(e.into());
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_origin(origin: &str) -> Result<(), String> {
    let url = Url::parse(origin).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme `{}`", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.query().is_some() {
        return Err("query strings are not allowed".to_string());
    }
    if url.fragment().is_some() {
        return Err("fragments are not allowed".to_string());
    }
    Ok(())
}
