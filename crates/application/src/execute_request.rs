//! Execute request use case
//!
//! Runs a request through an [`HttpClient`] either inline or on a spawned
//! task that reports to a [`Callback`].

use std::sync::Arc;

use tokio::task::JoinHandle;
use witness_domain::{Failure, Request, Response};

use crate::error::ApplicationResult;
use crate::ports::{Callback, CancellationReceiver, HttpClient, HttpClientError};

/// Result type for request execution.
pub type ExecuteResult = Result<Response, Failure>;

/// Use case for executing HTTP requests.
///
/// # Example
///
/// ```ignore
/// let use_case = ExecuteRequest::new(Arc::new(ReqwestHttpClient::new()?));
/// let recorder = Arc::new(ResponseRecorder::new());
///
/// use_case.enqueue(Request::get(url.clone()), recorder.clone());
/// recorder.await_response(&url).await.assert_code(200);
/// ```
pub struct ExecuteRequest<C: HttpClient> {
    client: Arc<C>,
}

impl<C: HttpClient> ExecuteRequest<C> {
    /// Creates a new `ExecuteRequest` use case with the given HTTP client.
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Executes the request and returns the terminal response.
    ///
    /// # Errors
    ///
    /// Returns a [`Failure`] when [`Self::validate`] rejects the request or
    /// the exchange fails.
    pub async fn execute(&self, request: &Request) -> ExecuteResult {
        if let Err(error) = Self::validate(request) {
            tracing::debug!(url = %request.url, %error, "request rejected");
            return Err(error.into_failure(request.clone()));
        }
        tracing::debug!(method = %request.method, url = %request.url, "executing request");

        self.client
            .execute(request)
            .await
            .map_err(|e| Self::fail(request, e))
    }

    /// Executes the request unless `cancel` fires first.
    ///
    /// # Errors
    ///
    /// Returns a `Cancelled` failure when cancelled, otherwise as
    /// [`Self::execute`].
    pub async fn execute_with_cancellation(
        &self,
        request: &Request,
        mut cancel: CancellationReceiver,
    ) -> ExecuteResult {
        tokio::select! {
            result = self.execute(request) => result,
            () = cancel.cancelled() => Err(Self::fail(request, HttpClientError::Cancelled)),
        }
    }

    /// Checks `request` can be sent: an http(s) URL with a host and
    /// well-formed headers.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApplicationError::Domain`] describing the first problem.
    pub fn validate(request: &Request) -> ApplicationResult<()> {
        request.validate()?;
        Ok(())
    }

    fn fail(request: &Request, error: HttpClientError) -> Failure {
        tracing::debug!(url = %request.url, error = %error, "request failed");
        error.into_failure(request.clone())
    }
}

impl<C: HttpClient + 'static> ExecuteRequest<C> {
    /// Executes the request on a spawned task and reports the outcome to
    /// `callback`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn enqueue(&self, request: Request, callback: Arc<dyn Callback>) -> JoinHandle<()> {
        let use_case = Self {
            client: Arc::clone(&self.client),
        };
        tokio::spawn(async move {
            match use_case.execute(&request).await {
                Ok(response) => callback.on_response(response),
                Err(failure) => callback.on_failure(failure),
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{ApplicationError, RecorderConfig, ResponseRecorder};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use url::Url;
    use witness_domain::{FailureKind, HttpMethod, ResponseBody};

    /// Mock HTTP client for testing.
    struct MockHttpClient {
        result: Result<&'static str, HttpClientError>,
        delay: Duration,
    }

    impl MockHttpClient {
        fn success(body: &'static str) -> Self {
            Self {
                result: Ok(body),
                delay: Duration::ZERO,
            }
        }

        fn error(err: HttpClientError) -> Self {
            Self {
                result: Err(err),
                delay: Duration::ZERO,
            }
        }

        fn slow() -> Self {
            Self {
                result: Ok("late"),
                delay: Duration::from_secs(5),
            }
        }
    }

    #[async_trait]
    impl HttpClient for MockHttpClient {
        async fn execute(&self, request: &Request) -> Result<Response, HttpClientError> {
            tokio::time::sleep(self.delay).await;
            let body = self.result.clone()?;
            Ok(Response::new(request.clone(), 200u16).with_body(ResponseBody::text(body)))
        }
    }

    fn request(url: &str) -> Request {
        Request::parse(HttpMethod::Get, url).unwrap()
    }

    #[tokio::test]
    async fn test_execute_success() {
        let use_case = ExecuteRequest::new(Arc::new(MockHttpClient::success("OK")));

        let response = use_case.execute(&request("https://api.example.com/test")).await.unwrap();
        assert_eq!(response.code(), 200);
        assert_eq!(response.body.map(|b| b.string()), Some("OK".to_string()));
    }

    #[tokio::test]
    async fn test_execute_rejects_non_http_url() {
        let use_case = ExecuteRequest::new(Arc::new(MockHttpClient::success("OK")));
        let request = Request::get(Url::parse("file:///etc/hosts").unwrap());

        let failure = use_case.execute(&request).await.unwrap_err();
        assert_eq!(failure.kind, FailureKind::InvalidUrl);
    }

    #[tokio::test]
    async fn test_execute_rejects_malformed_header() {
        let use_case = ExecuteRequest::new(Arc::new(MockHttpClient::success("OK")));
        let request = request("http://example.com/").with_header("Bad Name", "x");

        let failure = use_case.execute(&request).await.unwrap_err();
        assert_eq!(failure.kind, FailureKind::InvalidRequest);
        assert_eq!(failure.message(), "invalid header name: Bad Name");
        assert!(matches!(
            ExecuteRequest::<MockHttpClient>::validate(&request),
            Err(ApplicationError::Domain(_))
        ));
    }

    #[tokio::test]
    async fn test_execute_http_error_becomes_failure() {
        let use_case = ExecuteRequest::new(Arc::new(MockHttpClient::error(
            HttpClientError::Timeout { timeout_ms: 5000 },
        )));

        let failure = use_case.execute(&request("https://api.example.com/test")).await.unwrap_err();
        assert_eq!(failure.kind, FailureKind::Timeout);
        assert_eq!(failure.message(), "timed out after 5000ms");
    }

    #[tokio::test]
    async fn test_execute_with_cancellation() {
        let use_case = ExecuteRequest::new(Arc::new(MockHttpClient::slow()));
        let (token, receiver) = crate::ports::CancellationToken::new();
        token.cancel();

        let failure = use_case
            .execute_with_cancellation(&request("https://api.example.com/slow"), receiver)
            .await
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::Cancelled);
    }

    #[tokio::test]
    async fn test_enqueue_reports_to_recorder() {
        let use_case = ExecuteRequest::new(Arc::new(MockHttpClient::success("queued")));
        let recorder = Arc::new(ResponseRecorder::with_config(
            RecorderConfig::default().with_await_timeout(Duration::from_secs(1)),
        ));
        let request = request("http://example.com/queued");

        use_case.enqueue(request.clone(), recorder.clone()).await.unwrap();
        recorder
            .await_response(request.url())
            .await
            .assert_request_url(request.url())
            .assert_code(200)
            .assert_body("queued");
    }

    #[tokio::test]
    async fn test_enqueue_reports_failures() {
        let use_case = ExecuteRequest::new(Arc::new(MockHttpClient::error(
            HttpClientError::Other("Read timed out".to_string()),
        )));
        let recorder = Arc::new(ResponseRecorder::new());
        let request = request("http://example.com/broken");

        use_case.enqueue(request.clone(), recorder.clone());
        recorder
            .await_response(request.url())
            .await
            .assert_failure("Read timed out");
    }
}
