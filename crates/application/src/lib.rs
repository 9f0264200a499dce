//! Witness Application - Use cases, ports and assertions
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for HTTP clients, callbacks and clocks)
//! - The execute-request use case
//! - [`ResponseRecorder`], which collects outcomes of enqueued requests
//! - [`RecordedResponse`], the fluent assertion surface used by tests

pub mod config;
pub mod error;
pub mod execute_request;
pub mod ports;
pub mod recorded;
pub mod recorder;

pub use config::RecorderConfig;
pub use error::{ApplicationError, ApplicationResult};
pub use execute_request::{ExecuteRequest, ExecuteResult};
pub use ports::{
    Callback, CancellationReceiver, CancellationToken, Clock, HttpClient, HttpClientError,
};
pub use recorded::RecordedResponse;
pub use recorder::ResponseRecorder;
