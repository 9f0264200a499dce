//! Response types
//!
//! A [`Response`] is one hop of an exchange. The terminal response of a
//! chain links back to the responses that led to it: the redirect that
//! preceded it, the cache entry that was consulted, and the conditional
//! request that revalidated that entry. Only the terminal hop carries a
//! body.

mod body;
mod status;

pub use body::ResponseBody;
pub use status::StatusCode;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::request::{Headers, Request};
use crate::tls::Handshake;

/// An HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// The request that produced this hop.
    pub request: Request,
    /// Status code.
    pub status: StatusCode,
    /// Reason phrase.
    pub message: String,
    /// Response headers.
    #[serde(default)]
    pub headers: Headers,
    /// TLS handshake, for responses received over TLS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handshake: Option<Handshake>,
    /// Body, present only on the terminal hop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<ResponseBody>,
    /// The redirect response that led to this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_response: Option<Box<Response>>,
    /// The cached response that was consulted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_response: Option<Box<Response>>,
    /// The conditional network response that revalidated the cache entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_response: Option<Box<Response>>,
    /// When the request was sent.
    pub sent_at: DateTime<Utc>,
    /// When the response headers were received.
    pub received_at: DateTime<Utc>,
}

impl Response {
    /// Creates a response to `request` with no headers, body or links.
    ///
    /// Both timestamps are set to now; use [`Self::with_timestamps`] to
    /// record real ones.
    #[must_use]
    pub fn new(request: Request, status: impl Into<StatusCode>) -> Self {
        let status = status.into();
        let now = Utc::now();
        Self {
            request,
            status,
            message: status.reason_phrase().to_string(),
            headers: Headers::new(),
            handshake: None,
            body: None,
            prior_response: None,
            cache_response: None,
            validation_response: None,
            sent_at: now,
            received_at: now,
        }
    }

    /// Overrides the reason phrase.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(name, value);
        self
    }

    /// Replaces all headers.
    #[must_use]
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the TLS handshake.
    #[must_use]
    pub fn with_handshake(mut self, handshake: Handshake) -> Self {
        self.handshake = Some(handshake);
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: ResponseBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Links the redirect response that preceded this one.
    #[must_use]
    pub fn with_prior_response(mut self, prior: Self) -> Self {
        self.prior_response = Some(Box::new(prior));
        self
    }

    /// Links the cached response that was consulted.
    #[must_use]
    pub fn with_cache_response(mut self, cached: Self) -> Self {
        self.cache_response = Some(Box::new(cached));
        self
    }

    /// Links the revalidation response.
    #[must_use]
    pub fn with_validation_response(mut self, validation: Self) -> Self {
        self.validation_response = Some(Box::new(validation));
        self
    }

    /// Records when the request was sent and the response received.
    #[must_use]
    pub const fn with_timestamps(
        mut self,
        sent_at: DateTime<Utc>,
        received_at: DateTime<Utc>,
    ) -> Self {
        self.sent_at = sent_at;
        self.received_at = received_at;
        self
    }

    /// Returns this response with its body removed.
    ///
    /// Intermediate hops are linked in this form.
    #[must_use]
    pub fn without_body(mut self) -> Self {
        self.body = None;
        self
    }

    /// Returns the status code as a number.
    #[must_use]
    pub const fn code(&self) -> u16 {
        self.status.as_u16()
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

    /// Returns true if a client should follow this response.
    #[must_use]
    pub fn is_redirect(&self) -> bool {
        self.status.is_redirect() && self.header("Location").is_some()
    }

    /// Returns the prior response, if this one was reached by a redirect.
    #[must_use]
    pub fn prior_response(&self) -> Option<&Self> {
        self.prior_response.as_deref()
    }

    /// Returns the cached response, if the cache was consulted.
    #[must_use]
    pub fn cache_response(&self) -> Option<&Self> {
        self.cache_response.as_deref()
    }

    /// Returns the revalidation response, if the cache entry was revalidated.
    #[must_use]
    pub fn validation_response(&self) -> Option<&Self> {
        self.validation_response.as_deref()
    }

    /// Returns the number of redirects that preceded this response.
    #[must_use]
    pub fn redirect_chain_len(&self) -> usize {
        std::iter::successors(self.prior_response(), |r| r.prior_response()).count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::request::HttpMethod;
    use pretty_assertions::assert_eq;

    fn request(url: &str) -> Request {
        Request::parse(HttpMethod::Get, url).unwrap()
    }

    #[test]
    fn test_new_sets_reason_phrase() {
        let response = Response::new(request("http://example.com/"), 404u16);
        assert_eq!(response.code(), 404);
        assert_eq!(response.message, "Not Found");
        assert!(response.body.is_none());
    }

    #[test]
    fn test_is_redirect_needs_location() {
        let without = Response::new(request("http://example.com/"), 302u16);
        assert!(!without.is_redirect());

        let with = without.with_header("Location", "/next");
        assert!(with.is_redirect());
    }

    #[test]
    fn test_redirect_chain_len() {
        let first = Response::new(request("http://example.com/a"), 301u16);
        let second = Response::new(request("http://example.com/b"), 302u16)
            .with_prior_response(first);
        let last = Response::new(request("http://example.com/c"), 200u16)
            .with_body(ResponseBody::text("done"))
            .with_prior_response(second);

        assert_eq!(last.redirect_chain_len(), 2);
        assert_eq!(
            last.prior_response().map(|r| r.request.url.path()),
            Some("/b")
        );
    }

    #[test]
    fn test_without_body() {
        let response = Response::new(request("http://example.com/"), 200u16)
            .with_body(ResponseBody::text("x"))
            .without_body();
        assert_eq!(response.body, None);
    }

    #[test]
    fn test_serde_skips_missing_links() {
        let response = Response::new(request("http://example.com/"), 200u16);
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("prior_response").is_none());
        assert!(json.get("handshake").is_none());

        let back: Response = serde_json::from_value(json).unwrap();
        assert_eq!(back, response);
    }
}
