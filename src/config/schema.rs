//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gatekeeper.
//! All types derive Serde traits for deserialization from config files.

use serde::Deserialize;

/// Root configuration for the gatekeeper proxy.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GatekeeperConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// The single upstream origin validated requests are forwarded to.
    pub upstream: UpstreamConfig,

    /// Required header gate.
    pub gate: GateConfig,

    /// Header forwarding policy.
    pub forwarding: ForwardingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8787").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8787".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Upstream origin configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Origin URL. Only scheme, host and port are used; the inbound
    /// path and query replace anything after the authority.
    pub origin: String,

    /// Deadline for the upstream response head, in seconds.
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Maximum redirects followed. Zero disables redirect following.
    pub max_redirects: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            origin: "https://jayquake.github.io".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 5,
            max_redirects: 10,
        }
    }
}

/// Required header gate configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Header names that must be present, in reporting order.
    pub required_headers: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            required_headers: crate::gate::DEFAULT_REQUIRED_HEADERS
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

/// Header forwarding policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForwardingConfig {
    /// Strip hop-by-hop headers from the request sent upstream.
    pub strip_hop_by_hop: bool,
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            strip_hop_by_hop: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
