//! Failed exchanges.
//!
//! A [`Failure`] is what a caller receives instead of a response when the
//! exchange could not complete: the request, a category, and the
//! underlying error message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::request::Request;

/// Categories of exchange failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Invalid URL format.
    InvalidUrl,
    /// The request could not be sent as built, e.g. a malformed header.
    InvalidRequest,
    /// DNS resolution failed.
    DnsError,
    /// Could not establish connection.
    ConnectionFailed,
    /// Connection was refused by the server.
    ConnectionRefused,
    /// Connect, read or write timed out.
    Timeout,
    /// TLS handshake or certificate error.
    TlsError,
    /// The response body could not be read.
    InvalidBody,
    /// Too many redirects.
    TooManyRedirects,
    /// The call was cancelled.
    Cancelled,
    /// Anything else.
    Unknown,
}

impl FailureKind {
    /// Returns a human-readable title for this failure kind.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::InvalidUrl => "Invalid URL",
            Self::InvalidRequest => "Invalid Request",
            Self::DnsError => "DNS Resolution Failed",
            Self::ConnectionFailed => "Connection Failed",
            Self::ConnectionRefused => "Connection Refused",
            Self::Timeout => "Timeout",
            Self::TlsError => "SSL/TLS Error",
            Self::InvalidBody => "Invalid Response Body",
            Self::TooManyRedirects => "Too Many Redirects",
            Self::Cancelled => "Cancelled",
            Self::Unknown => "Unknown Error",
        }
    }
}

/// An exchange that ended without a response.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct Failure {
    /// The request that failed.
    pub request: Request,
    /// Failure category.
    pub kind: FailureKind,
    /// The underlying error message.
    pub message: String,
}

impl Failure {
    /// Creates a failure for `request`.
    #[must_use]
    pub fn new(request: Request, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            request,
            kind,
            message: message.into(),
        }
    }

    /// Returns the underlying error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
