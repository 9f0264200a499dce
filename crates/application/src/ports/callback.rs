//! Callback port

use witness_domain::{Failure, Response};

/// Receives the outcome of an enqueued exchange.
///
/// Exactly one of the two methods is called per exchange, from the task
/// that ran it.
pub trait Callback: Send + Sync {
    /// The exchange produced a response. Only the terminal hop has a body.
    fn on_response(&self, response: Response);

    /// The exchange failed before a response was available.
    fn on_failure(&self, failure: Failure);
}
