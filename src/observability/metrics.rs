//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gatekeeper_requests_total` (counter): requests by outcome
//! - `gatekeeper_request_duration_seconds` (histogram): time to response head
//!
//! Outcomes are `rejected`, `forwarded` and `upstream_failed`. Recording is
//! a no-op until an exporter is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// How a request left the gatekeeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 403, required headers missing.
    Rejected,
    /// Upstream response relayed.
    Forwarded,
    /// 502, upstream unreachable.
    UpstreamFailed,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Rejected => "rejected",
            Outcome::Forwarded => "forwarded",
            Outcome::UpstreamFailed => "upstream_failed",
        }
    }
}

/// Start the Prometheus scrape endpoint. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished request.
pub fn record_request(outcome: Outcome, start: Instant) {
    let label = outcome.as_str();
    metrics::counter!("gatekeeper_requests_total", "outcome" => label).increment(1);
    metrics::histogram!("gatekeeper_request_duration_seconds", "outcome" => label)
        .record(start.elapsed().as_secs_f64());
}
