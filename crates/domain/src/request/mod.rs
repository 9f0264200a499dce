//! Request types
//!
//! A [`Request`] describes one HTTP exchange attempt: method, URL, headers
//! and an optional text body. Every hop of a redirect chain gets its own
//! request.

mod header;
mod method;

pub use header::{Header, Headers};
pub use method::HttpMethod;

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// An HTTP request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Unique identifier, shared by every hop of a followed redirect chain.
    pub id: Uuid,
    /// HTTP method.
    pub method: HttpMethod,
    /// Target URL.
    pub url: Url,
    /// Request headers.
    #[serde(default)]
    pub headers: Headers,
    /// Request body, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl Request {
    /// Creates a request for `url` with the given method.
    #[must_use]
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            id: crate::generate_id(),
            method,
            url,
            headers: Headers::new(),
            body: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(url: Url) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Parses `url` and creates a request.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUrl` when the URL does not parse or is not http(s).
    pub fn parse(method: HttpMethod, url: &str) -> DomainResult<Self> {
        let parsed = Url::parse(url).map_err(|e| DomainError::InvalidUrl(format!("{e}: {url}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DomainError::InvalidUrl(format!(
                "unsupported scheme '{}': {url}",
                parsed.scheme()
            )));
        }
        Ok(Self::new(method, parsed))
    }

    /// Adds a header (builder pattern).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(name, value);
        self
    }

    /// Sets the body (builder pattern).
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Returns the target URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Returns every value of the named header, in order.
    #[must_use]
    pub fn headers(&self, name: &str) -> Vec<&str> {
        self.headers.values(name)
    }

    /// Returns the last value of the named header.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Returns true if the request goes over TLS.
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.url.scheme() == "https"
    }

    /// Checks the request can be put on the wire: an http(s) URL with a
    /// host, and headers that survive [`Header::parse`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidUrl`, `InvalidHeaderName` or `InvalidHeaderValue`.
    pub fn validate(&self) -> DomainResult<()> {
        if !matches!(self.url.scheme(), "http" | "https") || self.url.host().is_none() {
            return Err(DomainError::InvalidUrl(format!(
                "expected an http or https URL: {}",
                self.url
            )));
        }
        for header in &self.headers {
            Header::parse(header.name.as_str(), header.value.as_str())?;
        }
        Ok(())
    }

    /// Builds the request for the next hop of a redirect.
    ///
    /// The id is kept. A switch to GET drops the body and its content
    /// headers; credentials are dropped when the host changes.
    #[must_use]
    pub fn redirected(&self, method: HttpMethod, url: Url) -> Self {
        let mut headers = self.headers.clone();
        let mut body = self.body.clone();

        if method != self.method && !method.has_body() {
            body = None;
            headers.remove("Content-Type");
            headers.remove("Content-Length");
        }
        if url.host_str() != self.url.host_str() {
            headers.remove("Authorization");
        }

        Self {
            id: self.id,
            method,
            url,
            headers,
            body,
        }
    }
}
