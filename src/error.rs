//! Client error types.
//!
//! # Error Classification
//!
//! | Variant           | Origin                                   | Retried? |
//! |-------------------|------------------------------------------|----------|
//! | `Config`          | Bad base address or config file          | no       |
//! | `InvalidArgument` | Caller passed an unusable value          | no       |
//! | `Network`         | Connect/DNS/IO failure on the wire       | no       |
//! | `Timeout`         | Transport-level timeout                  | no       |
//! | `Service`         | Non-success, non-deferred HTTP status    | no       |
//! | `Decode`          | Undecodable JSON or compressed content   | no       |
//! | `Cancelled`       | External cancellation token fired        | no       |
//!
//! The only status handled locally is `202 Accepted` during submission,
//! which drives the polling loop instead of surfacing an error.

use bytes::Bytes;
use http::StatusCode;
use thiserror::Error;

/// Analysis client errors.
#[derive(Error, Debug)]
pub enum ApiPortError {
    /// Client configuration is unusable (e.g. missing or malformed endpoint).
    #[error("Config error: {0}")]
    Config(String),

    /// An argument cannot be used for the requested operation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Network communication error.
    #[error("Network error: {0}")]
    Network(String),

    /// Transport timed out.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The service answered with a failure status.
    #[error("Service error: status={status}")]
    Service {
        /// HTTP status returned by the service.
        status: StatusCode,
        /// Raw response body, kept for diagnostics.
        body: Bytes,
    },

    /// Structured or compressed content could not be decoded.
    ///
    /// Usually a protocol/version mismatch between client and service
    /// rather than an operational failure.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Operation was cancelled by the caller.
    #[error("Operation cancelled")]
    Cancelled,

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiPortError {
    /// Status code carried by a service error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiPortError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Service error body as lossy UTF-8, if any.
    pub fn body_text(&self) -> Option<String> {
        match self {
            ApiPortError::Service { body, .. } => Some(String::from_utf8_lossy(body).into_owned()),
            _ => None,
        }
    }

    /// Whether this error is a cancellation rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiPortError::Cancelled)
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ApiPortError>;

impl From<serde_json::Error> for ApiPortError {
    fn from(err: serde_json::Error) -> Self {
        ApiPortError::Decode(format!("JSON error: {err}"))
    }
}

impl From<reqwest::Error> for ApiPortError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiPortError::Timeout(err.to_string())
        } else {
            ApiPortError::Network(err.to_string())
        }
    }
}

impl From<toml::de::Error> for ApiPortError {
    fn from(err: toml::de::Error) -> Self {
        ApiPortError::Config(err.to_string())
    }
}
