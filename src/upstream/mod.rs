//! Upstream forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! validated Request<Body>
//!     → origin.rs (target URI: origin authority + inbound path/query, verbatim)
//!     → headers.rs (drop Host and hop-by-hop headers)
//!     → client.rs (send with streamed body, bounded by timeout)
//!     → redirect.rs (follow 3xx while the request can be repeated)
//!     → Response<Incoming> handed back for relaying
//! ```

pub mod client;
pub mod headers;
pub mod origin;
pub mod redirect;

pub use client::UpstreamClient;
pub use origin::Origin;
