//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handling produces:
//!     → tracing.rs (per-request span with request ID)
//!     → logging.rs (structured log events, pretty or JSON)
//!     → metrics.rs (outcome counters, latency histogram)
//!
//! Consumers:
//!     → stdout log aggregation
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
pub mod tracing;
