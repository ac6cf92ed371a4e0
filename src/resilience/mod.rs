//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → timeouts.rs (enforce response-head deadline)
//!     → on expiry or transport error: 502, no retry
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every upstream call has a deadline
//! - No retries and no circuit breaker: every request is evaluated once

pub mod timeouts;

pub use timeouts::with_timeout;
