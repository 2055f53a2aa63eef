use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("server I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("server did not drain within {0:?}")]
    ShutdownTimeout(Duration),

    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A running axum server.
///
/// The server stops accepting once its token is cancelled and finishes the
/// requests already in flight.
#[derive(Debug)]
pub struct HttpServer {
    name: &'static str,
    local_addr: SocketAddr,
    cancel: CancellationToken,
    handle: JoinHandle<io::Result<()>>,
}

impl HttpServer {
    /// Bind `addr` and start serving `router`.
    ///
    /// # Errors
    /// [`ServerError::Bind`] if the address cannot be bound.
    pub async fn start(
        name: &'static str,
        addr: &str,
        router: Router,
        cancel: CancellationToken,
    ) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr).await.map_err(|source| ServerError::Bind {
            addr: addr.to_owned(),
            source,
        })?;
        Self::from_listener(name, listener, router, cancel)
    }

    /// Serve on an already bound listener.
    ///
    /// # Errors
    /// [`ServerError::Io`] if the listener has no local address.
    pub fn from_listener(
        name: &'static str,
        listener: TcpListener,
        router: Router,
        cancel: CancellationToken,
    ) -> Result<Self, ServerError> {
        let local_addr = listener.local_addr()?;
        tracing::info!(service = name, %local_addr, "HTTP server bound");

        let shutdown = {
            let cancel = cancel.clone();
            async move {
                cancel.cancelled().await;
                tracing::info!(service = name, "HTTP server shutting down gracefully");
            }
        };
        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown)
                .await
        });

        Ok(Self {
            name,
            local_addr,
            cancel,
            handle,
        })
    }

    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Cancel (if not already) and wait up to `drain_timeout` for the server
    /// task to finish. On timeout the task is aborted.
    ///
    /// # Errors
    /// - [`ServerError::ShutdownTimeout`] if draining took too long.
    /// - [`ServerError::Io`] / [`ServerError::Join`] if the server task failed.
    pub async fn stop(self, drain_timeout: Duration) -> Result<(), ServerError> {
        self.cancel.cancel();
        let abort = self.handle.abort_handle();
        match tokio::time::timeout(drain_timeout, self.handle).await {
            Ok(joined) => {
                joined??;
                tracing::info!(service = self.name, "HTTP server stopped");
                Ok(())
            }
            Err(_) => {
                abort.abort();
                Err(ServerError::ShutdownTimeout(drain_timeout))
            }
        }
    }
}
