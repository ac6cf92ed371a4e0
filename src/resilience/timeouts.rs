//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap the upstream call with a deadline
//! - Cancel the in-flight call cleanly on expiry
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - Timed-out requests take the same 502 path as transport failures

use std::future::Future;
use std::time::Duration;

use crate::error::UpstreamError;

/// Run `fut` with a deadline, mapping expiry to [`UpstreamError::Timeout`].
pub async fn with_timeout<F, T, E>(deadline: Duration, fut: F) -> Result<T, UpstreamError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<UpstreamError>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => Err(UpstreamError::Timeout(deadline)),
    }
}
