//! Required header gate.
//!
//! # Data Flow
//! ```text
//! inbound HeaderMap
//!     → required.rs (presence check against the Required Header Set)
//!     → Ok: request continues to the upstream
//!     → Err(MissingHeaders): rejection.rs builds the 403 page
//! ```
//!
//! Only presence is checked. Header values, including signatures, are
//! never inspected.

pub mod rejection;
pub mod required;

pub use rejection::{display_host, rejection_response, X_CUSTOM_HEADERS_REQUIRED};
pub use required::{MissingHeaders, RequiredHeaders, RequiredHeadersError, DEFAULT_REQUIRED_HEADERS};
