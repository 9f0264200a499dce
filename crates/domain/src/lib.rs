//! Witness Domain - HTTP exchange types
//!
//! This crate defines the model of a completed HTTP exchange: requests,
//! responses and the chain of responses behind them, TLS handshakes and
//! failures. All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod failure;
pub mod id;
pub mod request;
pub mod response;
pub mod tls;

pub use error::{DomainError, DomainResult};
pub use failure::{Failure, FailureKind};
pub use id::generate_id;
pub use request::{Header, Headers, HttpMethod, Request};
pub use response::{Response, ResponseBody, StatusCode};
pub use tls::{Certificate, Handshake, TlsVersion};
