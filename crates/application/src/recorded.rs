//! Recorded exchange outcomes with fluent assertions.
//!
//! Every `assert_*` method panics on mismatch, so a failing expectation
//! fails the enclosing test at the caller's line. Assertions return
//! `&Self` so they chain; the `*_response` methods descend into a linked
//! response and return a new record for it.

#![allow(clippy::panic, clippy::missing_panics_doc)]

use pretty_assertions::assert_eq;
use url::Url;
use witness_domain::{Failure, Request, Response};

/// A received response or failure, as recorded by a
/// [`ResponseRecorder`](crate::ResponseRecorder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedResponse {
    request: Request,
    response: Option<Response>,
    body: Option<String>,
    failure: Option<Failure>,
}

impl RecordedResponse {
    /// Creates a record from its four parts.
    #[must_use]
    pub const fn new(
        request: Request,
        response: Option<Response>,
        body: Option<String>,
        failure: Option<Failure>,
    ) -> Self {
        Self {
            request,
            response,
            body,
            failure,
        }
    }

    /// Records a response and the text of its body.
    #[must_use]
    pub const fn success(request: Request, response: Response, body: Option<String>) -> Self {
        Self::new(request, Some(response), body, None)
    }

    /// Records a failed exchange.
    #[must_use]
    pub const fn failed(request: Request, failure: Failure) -> Self {
        Self::new(request, None, None, Some(failure))
    }

    /// The request this outcome belongs to.
    #[must_use]
    pub const fn request(&self) -> &Request {
        &self.request
    }

    /// The response, unless the exchange failed.
    #[must_use]
    pub const fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    /// The body text. Only the terminal hop of a chain has one.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// The failure, if the exchange failed.
    #[must_use]
    pub const fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    #[track_caller]
    fn require_response(&self) -> &Response {
        match (&self.response, &self.failure) {
            (Some(response), _) => response,
            (None, Some(failure)) => panic!(
                "expected a response but the exchange failed: {} ({})",
                failure.message(),
                failure.kind.title()
            ),
            (None, None) => panic!("expected a response but none was recorded"),
        }
    }

    /// Asserts the request was sent to `url`.
    #[track_caller]
    pub fn assert_request_url(&self, url: &Url) -> &Self {
        assert_eq!(self.request.url(), url, "request URL");
        self
    }

    /// Asserts the request carried exactly `values` for `name`, in order.
    #[track_caller]
    pub fn assert_request_header(&self, name: &str, values: &[&str]) -> &Self {
        assert_eq!(
            self.request.headers(name),
            values,
            "request header {name:?}"
        );
        self
    }

    /// Asserts the response status code.
    #[track_caller]
    pub fn assert_code(&self, expected: u16) -> &Self {
        assert_eq!(self.require_response().code(), expected, "status code");
        self
    }

    /// Asserts the response carried exactly `values` for `name`, in order.
    #[track_caller]
    pub fn assert_header(&self, name: &str, values: &[&str]) -> &Self {
        assert_eq!(
            self.require_response().headers(name),
            values,
            "response header {name:?}"
        );
        self
    }

    /// Asserts the body text.
    #[track_caller]
    pub fn assert_body(&self, expected: &str) -> &Self {
        assert_eq!(self.body.as_deref(), Some(expected), "response body");
        self
    }

    /// Asserts a one-way TLS handshake took place: a cipher suite was
    /// negotiated and the server identified itself with a single
    /// certificate while the client presented none.
    #[track_caller]
    pub fn assert_handshake(&self) -> &Self {
        let Some(handshake) = self.require_response().handshake.as_ref() else {
            panic!("expected a TLS handshake but the response has none");
        };
        assert!(
            handshake.cipher_suite.is_some(),
            "expected a negotiated cipher suite"
        );
        assert!(
            handshake.peer_principal.is_some(),
            "expected a peer principal"
        );
        assert_eq!(
            handshake.peer_certificates.len(),
            1,
            "peer certificate count"
        );
        assert_eq!(
            handshake.local_principal.as_deref(),
            None,
            "local principal"
        );
        assert_eq!(
            handshake.local_certificates.len(),
            0,
            "local certificate count"
        );
        self
    }

    /// Asserts the response was reached by a redirect and returns a record
    /// for the response to the original request.
    #[track_caller]
    #[must_use]
    pub fn prior_response(&self) -> Self {
        let prior = self.require_response().prior_response();
        Self::linked(prior, "prior")
    }

    /// Asserts the cache was consulted and returns a record for the cached
    /// response.
    #[track_caller]
    #[must_use]
    pub fn cache_response(&self) -> Self {
        let cached = self.require_response().cache_response();
        Self::linked(cached, "cache")
    }

    /// Asserts the cached response was revalidated and returns a record for
    /// the validation response.
    #[track_caller]
    #[must_use]
    pub fn validation_response(&self) -> Self {
        let validation = self.require_response().validation_response();
        Self::linked(validation, "validation")
    }

    #[track_caller]
    fn linked(linked: Option<&Response>, role: &str) -> Self {
        let Some(linked) = linked else {
            panic!("expected a {role} response but there is none");
        };
        assert!(
            linked.body.is_none(),
            "expected the {role} response to have no body"
        );
        Self::new(linked.request.clone(), Some(linked.clone()), None, None)
    }

    /// Asserts the exchange failed with exactly `message`.
    #[track_caller]
    pub fn assert_failure(&self, message: &str) {
        let Some(failure) = self.failure.as_ref() else {
            panic!("expected a failure but the exchange succeeded");
        };
        assert_eq!(failure.message(), message, "failure message");
    }
}
