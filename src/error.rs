//! Error Types
//!
//! Failures surfaced by the controller. Every variant renders into the single
//! user-visible error string.

use thiserror::Error;

/// A failed request against the items API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Server answered with a non-2xx status
    #[error("{operation} failed: {status}")]
    Status { operation: String, status: u16 },
    /// Transport-level failure (host unreachable, CORS, aborted)
    #[error("{operation} failed: {reason}")]
    Network { operation: String, reason: String },
    /// 2xx response whose body could not be read
    #[error("{operation} returned an unreadable body: {reason}")]
    Decode { operation: String, reason: String },
    /// Request could not be built (e.g. payload serialization)
    #[error("{operation} could not be sent: {reason}")]
    Request { operation: String, reason: String },
}

impl FetchError {
    pub fn status(operation: impl Into<String>, status: u16) -> Self {
        Self::Status { operation: operation.into(), status }
    }

    pub fn network(operation: impl Into<String>, reason: impl ToString) -> Self {
        Self::Network { operation: operation.into(), reason: reason.to_string() }
    }

    pub fn decode(operation: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode { operation: operation.into(), reason: reason.to_string() }
    }

    pub fn request(operation: impl Into<String>, reason: impl ToString) -> Self {
        Self::Request { operation: operation.into(), reason: reason.to_string() }
    }

    /// HTTP status code, when the failure came from the server
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Draft rejected before any request is issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Name is required")]
    MissingName,
    #[error("Email is required")]
    MissingEmail,
    #[error("Email must look like name@example.com")]
    MalformedEmail,
}

/// Startup configuration problems
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("configuration value `{0}` is missing")]
    Missing(&'static str),
    #[error("configuration value `{field}` is not an http(s) URL: {value}")]
    InvalidUrl { field: &'static str, value: String },
    #[error("unknown log level: {0}")]
    InvalidLogLevel(String),
    #[error("configuration could not be read: {0}")]
    Unreadable(String),
}
