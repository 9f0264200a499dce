//! HTTP client port

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;
use witness_domain::{Failure, FailureKind, Request, Response};

/// Errors an [`HttpClient`] can report.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpClientError {
    /// The URL could not be used.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The host name could not be resolved.
    #[error("failed to resolve {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The exchange did not finish in time.
    #[error("timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed, in milliseconds.
        timeout_ms: u64,
    },

    /// TLS negotiation or certificate validation failed.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The redirect limit was exceeded.
    #[error("too many follow-up requests: {max}")]
    TooManyRedirects {
        /// Maximum number of redirects allowed.
        max: usize,
    },

    /// The response body could not be read.
    #[error("failed to read body: {0}")]
    InvalidBody(String),

    /// The exchange was cancelled.
    #[error("cancelled")]
    Cancelled,

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

impl HttpClientError {
    /// Returns the failure category for this error.
    #[must_use]
    pub const fn to_failure_kind(&self) -> FailureKind {
        match self {
            Self::InvalidUrl(_) => FailureKind::InvalidUrl,
            Self::DnsError { .. } => FailureKind::DnsError,
            Self::ConnectionRefused { .. } => FailureKind::ConnectionRefused,
            Self::ConnectionFailed(_) => FailureKind::ConnectionFailed,
            Self::Timeout { .. } => FailureKind::Timeout,
            Self::Tls(_) => FailureKind::TlsError,
            Self::TooManyRedirects { .. } => FailureKind::TooManyRedirects,
            Self::InvalidBody(_) => FailureKind::InvalidBody,
            Self::Cancelled => FailureKind::Cancelled,
            Self::Other(_) => FailureKind::Unknown,
        }
    }

    /// Converts this error into a domain failure of `request`.
    #[must_use]
    pub fn into_failure(self, request: Request) -> Failure {
        let kind = self.to_failure_kind();
        Failure::new(request, kind, self.to_string())
    }
}

/// Port for executing HTTP requests.
///
/// Implementations follow redirects themselves and return the terminal
/// response with the earlier hops linked as prior responses.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Executes `request` and returns the terminal response.
    ///
    /// # Errors
    ///
    /// Returns an error if no response could be obtained.
    async fn execute(&self, request: &Request) -> Result<Response, HttpClientError>;
}

/// Cancels an in-flight exchange.
#[derive(Debug)]
pub struct CancellationToken {
    sender: watch::Sender<bool>,
}

/// The receiving half of a [`CancellationToken`].
#[derive(Debug, Clone)]
pub struct CancellationReceiver {
    receiver: watch::Receiver<bool>,
}

impl CancellationToken {
    /// Creates a token and the receiver to hand to the exchange.
    #[must_use]
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (Self, CancellationReceiver) {
        let (sender, receiver) = watch::channel(false);
        (Self { sender }, CancellationReceiver { receiver })
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    /// Returns true once [`Self::cancel`] has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }
}

impl CancellationReceiver {
    /// Resolves once the token is cancelled.
    ///
    /// Never resolves if the token is dropped without cancelling.
    pub async fn cancelled(&mut self) {
        let closed = self.receiver.wait_for(|cancelled| *cancelled).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}
