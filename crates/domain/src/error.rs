//! Domain error types

use thiserror::Error;

use crate::failure::FailureKind;

/// Domain-level errors raised while building requests and responses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid, malformed, or not http(s).
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A header name contains characters outside the HTTP token set.
    #[error("invalid header name: {0}")]
    InvalidHeaderName(String),

    /// A header value contains a line break or control character.
    #[error("invalid header value: {0}")]
    InvalidHeaderValue(String),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),
}

impl DomainError {
    /// Returns the failure category reported when a request is rejected
    /// with this error.
    #[must_use]
    pub const fn failure_kind(&self) -> FailureKind {
        match self {
            Self::InvalidUrl(_) => FailureKind::InvalidUrl,
            Self::InvalidHeaderName(_)
            | Self::InvalidHeaderValue(_)
            | Self::UnsupportedMethod(_) => FailureKind::InvalidRequest,
        }
    }
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
