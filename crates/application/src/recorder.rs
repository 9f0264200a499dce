//! Response recorder
//!
//! Collects the outcomes of enqueued exchanges so a test can wait for the
//! one it cares about.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tokio::time::Instant;
use url::Url;
use witness_domain::{Failure, Response};

use crate::config::RecorderConfig;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::Callback;
use crate::recorded::RecordedResponse;

/// Records every response and failure delivered to it.
///
/// Share it behind an `Arc` with the tasks that deliver outcomes, then
/// call [`Self::await_response`] from the test.
#[derive(Debug, Default)]
pub struct ResponseRecorder {
    config: RecorderConfig,
    responses: Mutex<Vec<RecordedResponse>>,
    recorded: Notify,
}

impl ResponseRecorder {
    /// Creates a recorder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a recorder with the given configuration.
    #[must_use]
    pub fn with_config(config: RecorderConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RecordedResponse>> {
        self.responses.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, recorded: RecordedResponse) {
        self.lock().push(recorded);
        self.recorded.notify_waiters();
    }

    fn take(&self, url: &Url) -> Option<RecordedResponse> {
        let mut responses = self.lock();
        let index = responses
            .iter()
            .position(|r| was_sent_to(r, url))?;
        Some(responses.remove(index))
    }

    /// Waits for the outcome of a request to `url` and removes it.
    ///
    /// A redirected exchange matches both its final URL and the URL of any
    /// earlier hop. Outcomes for the same URL are returned in the order
    /// they were recorded.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Timeout`] if nothing arrives within the
    /// configured await timeout.
    pub async fn try_await_response(&self, url: &Url) -> ApplicationResult<RecordedResponse> {
        let deadline = Instant::now() + self.config.await_timeout;
        loop {
            // Register interest before checking so a response recorded in
            // between still wakes us.
            let notified = self.recorded.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(recorded) = self.take(url) {
                return Ok(recorded);
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                tracing::debug!(%url, "gave up waiting for response");
                return Err(ApplicationError::Timeout(format!("response to {url}")));
            }
        }
    }

    /// Waits for the outcome of a request to `url`, failing the test if it
    /// does not arrive in time.
    ///
    /// # Panics
    ///
    /// Panics with "timed out waiting for response to `url`" on timeout.
    #[allow(clippy::panic)]
    pub async fn await_response(&self, url: &Url) -> RecordedResponse {
        match self.try_await_response(url).await {
            Ok(recorded) => recorded,
            Err(_) => panic!("timed out waiting for response to {url}"),
        }
    }

    /// Returns how many outcomes are recorded and not yet awaited.
    #[must_use]
    pub fn recorded_count(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing is waiting to be awaited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

fn was_sent_to(recorded: &RecordedResponse, url: &Url) -> bool {
    recorded.request().url() == url
        || recorded.response().is_some_and(|response| {
            std::iter::successors(response.prior_response(), |r| r.prior_response())
                .any(|prior| prior.request.url() == url)
        })
}

impl Callback for ResponseRecorder {
    fn on_response(&self, response: Response) {
        let body = response.body.as_ref().map(witness_domain::ResponseBody::string);
        tracing::debug!(
            url = %response.request.url,
            status = response.code(),
            "recorded response"
        );
        self.record(RecordedResponse::success(
            response.request.clone(),
            response,
            body,
        ));
    }

    fn on_failure(&self, failure: Failure) {
        tracing::debug!(
            url = %failure.request.url,
            kind = ?failure.kind,
            message = %failure.message,
            "recorded failure"
        );
        self.record(RecordedResponse::failed(failure.request.clone(), failure));
    }
}
