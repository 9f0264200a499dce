//! Application error types

use thiserror::Error;
use witness_domain::{DomainError, Failure, FailureKind, Request};

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A request was rejected before it was sent.
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Waiting for an outcome took longer than allowed.
    #[error("timed out waiting for {0}")]
    Timeout(String),
}

impl ApplicationError {
    /// Returns the failure category for this error.
    #[must_use]
    pub const fn to_failure_kind(&self) -> FailureKind {
        match self {
            Self::Domain(error) => error.failure_kind(),
            Self::Timeout(_) => FailureKind::Timeout,
        }
    }

    /// Converts this error into a domain failure of `request`.
    #[must_use]
    pub fn into_failure(self, request: Request) -> Failure {
        let kind = self.to_failure_kind();
        Failure::new(request, kind, self.to_string())
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use witness_domain::HttpMethod;

    #[test]
    fn test_rejected_header_becomes_invalid_request() {
        let request = Request::parse(HttpMethod::Get, "http://example.com/").unwrap();
        let error = ApplicationError::from(DomainError::InvalidHeaderName("Bad Name".to_string()));

        let failure = error.into_failure(request);
        assert_eq!(failure.kind, FailureKind::InvalidRequest);
        assert_eq!(failure.message(), "invalid header name: Bad Name");
    }
}
