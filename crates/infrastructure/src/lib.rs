//! Witness Infrastructure - Adapters and runtime wiring
//!
//! This crate provides the reqwest implementation of the `HttpClient`
//! port, the system clock, client configuration and tracing setup.

pub mod adapters;
pub mod config;
pub mod logging;

pub use adapters::{ReqwestHttpClient, SystemClock};
pub use config::ClientConfig;
pub use logging::init_tracing;
