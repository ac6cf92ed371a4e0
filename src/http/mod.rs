//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, request span, gate handler)
//!     → gate (required header presence check)
//!         → missing: 403 rejection page
//!         → present: upstream client forwards the request
//!     → response.rs (relay with provenance headers, or 502)
//!     → Send to client
//! ```

pub mod response;
pub mod server;

pub use response::{X_CUSTOM_HEADERS_VALIDATED, X_VALIDATED_HEADERS};
pub use server::{AppState, HttpServer};
