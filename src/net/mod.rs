//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → tls.rs (optional TLS handshake via axum-server/rustls)
//!     → Hand off to HTTP layer
//! ```
//!
//! Plain HTTP is served by `axum::serve`; TLS is handled transparently
//! when `listener.tls` is configured.

pub mod tls;

pub use tls::load_tls_config;
