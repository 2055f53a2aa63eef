//! HTTP/1.1 client side of the transport.
//!
//! Every [`HttpConnector::connect`] opens a fresh TCP connection and performs
//! the HTTP/1.1 handshake; the connection driver runs on its own task and is
//! aborted when the [`HttpConnection`] is dropped.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{CONTENT_TYPE, HOST};
use http_body_util::{BodyExt, Full};
use hyper::client::conn::http1::{self, SendRequest};
use hyper_util::rt::TokioIo;
use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::{CallError, Connection, Connector, RemoteRequest, RemoteResponse};

fn duration_to_u64_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Timeouts applied by [`HttpConnector`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct TransportConfig {
    /// Timeout for establishing the TCP connection and the HTTP handshake.
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,

    /// Timeout for a single call, from sending the request to having read
    /// the whole response body.
    #[serde(with = "humantime_serde")]
    pub call_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(2),
            call_timeout: Duration::from_secs(5),
        }
    }
}

impl TransportConfig {
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }
}

/// Connector opening plain-text HTTP/1.1 connections.
#[derive(Debug, Clone, Default)]
pub struct HttpConnector {
    cfg: TransportConfig,
}

impl HttpConnector {
    #[must_use]
    pub fn new(cfg: TransportConfig) -> Self {
        Self { cfg }
    }

    #[must_use]
    pub fn config(&self) -> &TransportConfig {
        &self.cfg
    }
}

#[async_trait]
impl Connector for HttpConnector {
    async fn connect(&self, address: &str) -> Result<Box<dyn Connection>, CallError> {
        let span = tracing::debug_span!(
            "transport_connect",
            address = %address,
            connect_timeout_ms = duration_to_u64_ms(self.cfg.connect_timeout),
        );

        async move {
            let stream = tokio::time::timeout(self.cfg.connect_timeout, TcpStream::connect(address))
                .await
                .map_err(|_| CallError::ConnectTimeout {
                    address: address.to_owned(),
                    timeout: self.cfg.connect_timeout,
                })?
                .map_err(|source| CallError::Connect {
                    address: address.to_owned(),
                    source,
                })?;

            if let Err(e) = stream.set_nodelay(true) {
                tracing::debug!(error = %e, "failed to set TCP_NODELAY");
            }

            let (sender, conn) = tokio::time::timeout(
                self.cfg.connect_timeout,
                http1::handshake::<_, Full<Bytes>>(TokioIo::new(stream)),
            )
            .await
            .map_err(|_| CallError::ConnectTimeout {
                address: address.to_owned(),
                timeout: self.cfg.connect_timeout,
            })??;

            let driver = tokio::spawn(
                async move {
                    if let Err(e) = conn.await {
                        tracing::debug!(error = %e, "connection closed with error");
                    }
                }
                .in_current_span(),
            );

            tracing::debug!("connection established");

            let connection: Box<dyn Connection> = Box::new(HttpConnection {
                address: address.to_owned(),
                sender,
                driver,
                call_timeout: self.cfg.call_timeout,
            });
            Ok::<_, CallError>(connection)
        }
        .instrument(span)
        .await
    }
}

/// A single HTTP/1.1 connection. Closed on drop.
pub struct HttpConnection {
    address: String,
    sender: SendRequest<Full<Bytes>>,
    driver: JoinHandle<()>,
    call_timeout: Duration,
}

impl std::fmt::Debug for HttpConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConnection")
            .field("address", &self.address)
            .field("call_timeout", &self.call_timeout)
            .finish_non_exhaustive()
    }
}

impl Drop for HttpConnection {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

impl HttpConnection {
    fn build_request(&self, request: RemoteRequest) -> Result<http::Request<Full<Bytes>>, CallError> {
        let mut builder = http::Request::builder()
            .method(request.method)
            .uri(request.path)
            .header(HOST, self.address.as_str());
        if request.body.is_some() {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }
        Ok(builder.body(Full::new(request.body.unwrap_or_default()))?)
    }
}

#[async_trait]
impl Connection for HttpConnection {
    fn address(&self) -> &str {
        &self.address
    }

    async fn call(&mut self, request: RemoteRequest) -> Result<RemoteResponse, CallError> {
        let method = request.method.clone();
        let path = request.path.clone();
        let req = self.build_request(request)?;
        let sender = &mut self.sender;

        let exchange = async move {
            sender.ready().await?;
            let resp = sender.send_request(req).await?;
            let (parts, body) = resp.into_parts();
            let body = body.collect().await?.to_bytes();
            Ok::<_, CallError>((parts.status, body))
        };

        let (status, body) = tokio::time::timeout(self.call_timeout, exchange)
            .await
            .map_err(|_| CallError::Timeout(self.call_timeout))??;

        tracing::debug!(%method, %path, status = status.as_u16(), "remote call completed");

        if status.is_success() {
            Ok(RemoteResponse { status, body })
        } else {
            Err(CallError::from_status(status, &body))
        }
    }
}
