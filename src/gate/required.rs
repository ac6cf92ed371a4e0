//! The Required Header Set and the presence check.
//!
//! # Design Decisions
//! - Names are stored as `HeaderName`, which is always lowercase, so lookups
//!   against a `HeaderMap` are case-insensitive for free
//! - Presence only: a header entry with an empty or whitespace value counts
//! - The comma-joined list is computed once and reused for every response

use std::fmt;

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use thiserror::Error;

/// Header names required when no configuration overrides them.
pub const DEFAULT_REQUIRED_HEADERS: [&str; 3] = ["signature-input", "signature", "signature-agent"];

/// Error building a [`RequiredHeaders`] set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequiredHeadersError {
    #[error("at least one required header must be named")]
    Empty,

    #[error("`{0}` is not a valid header name")]
    InvalidName(String),

    #[error("`{0}` is listed more than once")]
    Duplicate(String),
}

/// Ordered, immutable set of header names that gate forwarding.
#[derive(Debug, Clone)]
pub struct RequiredHeaders {
    names: Vec<HeaderName>,
    joined: HeaderValue,
}

impl RequiredHeaders {
    /// Build a set from configured names, preserving their order.
    pub fn new<I, S>(names: I) -> Result<Self, RequiredHeadersError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed: Vec<HeaderName> = Vec::new();
        for name in names {
            let name = name.as_ref();
            let header = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| RequiredHeadersError::InvalidName(name.to_string()))?;
            if parsed.contains(&header) {
                return Err(RequiredHeadersError::Duplicate(name.to_string()));
            }
            parsed.push(header);
        }

        if parsed.is_empty() {
            return Err(RequiredHeadersError::Empty);
        }

        let joined = join_names(&parsed);
        let joined =
            HeaderValue::from_str(&joined).map_err(|_| RequiredHeadersError::InvalidName(joined))?;

        Ok(Self {
            names: parsed,
            joined,
        })
    }

    /// Required names in declared order.
    pub fn names(&self) -> &[HeaderName] {
        &self.names
    }

    /// All names joined with `", "`, ready to use as a header value.
    pub fn joined(&self) -> &HeaderValue {
        &self.joined
    }

    /// Check an inbound header map.
    ///
    /// Returns the absent names, in declared order, when any are missing.
    pub fn check(&self, headers: &HeaderMap) -> Result<(), MissingHeaders> {
        let missing: Vec<HeaderName> = self
            .names
            .iter()
            .filter(|name| !headers.contains_key(*name))
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(MissingHeaders(missing))
        }
    }
}

/// Required headers absent from one request. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingHeaders(Vec<HeaderName>);

impl MissingHeaders {
    /// Missing names in declared order.
    pub fn names(&self) -> &[HeaderName] {
        &self.0
    }

    pub fn contains(&self, name: &HeaderName) -> bool {
        self.0.contains(name)
    }
}

impl fmt::Display for MissingHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing required headers: {}", join_names(&self.0))
    }
}

impl std::error::Error for MissingHeaders {}

fn join_names(names: &[HeaderName]) -> String {
    names
        .iter()
        .map(HeaderName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
