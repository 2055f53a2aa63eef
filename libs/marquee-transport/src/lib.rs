//! Remote call transport used by the gateways and the remote registry.
//!
//! The contract is deliberately small: a [`Connector`] opens a [`Connection`]
//! to one `host:port`, the caller issues one or more calls on it and drops it.
//! Dropping a connection closes the underlying socket. Nothing is pooled.
//!
//! The shipped implementation, [`client::HttpConnector`], speaks JSON over
//! HTTP/1.1 and maps error responses carrying RFC 9457 problem bodies into
//! [`CallError`], keeping "not found" distinguishable from every other failure.

use async_trait::async_trait;

pub mod client;
pub mod error;
pub mod request;

pub use client::{HttpConnector, TransportConfig};
pub use error::CallError;
pub use request::{RemoteRequest, RemoteResponse, encode_segment};

/// Opens request-scoped connections to a single address.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Establish a connection to `address` (`host:port`).
    ///
    /// # Errors
    /// Returns [`CallError::Connect`] / [`CallError::ConnectTimeout`] when the
    /// peer cannot be reached.
    async fn connect(&self, address: &str) -> Result<Box<dyn Connection>, CallError>;
}

/// One open connection to a remote instance.
#[async_trait]
pub trait Connection: Send {
    /// Address this connection was opened to.
    fn address(&self) -> &str;

    /// Issue a single unary call.
    ///
    /// # Errors
    /// Returns [`CallError::NotFound`] when the remote reports a missing
    /// entity, and another [`CallError`] variant for any other failure.
    async fn call(&mut self, request: RemoteRequest) -> Result<RemoteResponse, CallError>;
}
