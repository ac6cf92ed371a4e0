//! Header-gated reverse proxy.
//!
//! Requests missing any of the required headers get a 403; everything else
//! is forwarded verbatim to a single upstream origin.

pub mod config;
pub mod error;
pub mod gate;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod resilience;
pub mod upstream;

pub use config::schema::GatekeeperConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
