use std::sync::Arc;

use marquee_transport::{CallError, Connection, Connector};
use rand::seq::IndexedRandom;
use thiserror::Error;

use crate::{Registry, RegistryError};

#[derive(Error, Debug)]
pub enum ResolveError {
    /// The registry returned no live address for the service, or could not
    /// be asked.
    #[error("service '{service}' is unavailable")]
    ServiceUnavailable {
        service: String,
        #[source]
        source: Option<RegistryError>,
    },

    /// An address was picked but the connection attempt failed.
    #[error("failed to connect to '{service}' at {address}")]
    Connect {
        service: String,
        address: String,
        #[source]
        source: CallError,
    },
}

/// Turns a logical service name into an open connection to one of its live
/// instances, chosen uniformly at random on every call.
///
/// Nothing is cached: each call asks the registry again and opens a new
/// connection, which the caller drops when done.
#[derive(Clone)]
pub struct Resolver {
    registry: Arc<dyn Registry>,
    connector: Arc<dyn Connector>,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}

impl Resolver {
    pub fn new(registry: Arc<dyn Registry>, connector: Arc<dyn Connector>) -> Self {
        Self {
            registry,
            connector,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<dyn Registry> {
        &self.registry
    }

    /// Open a connection to a live instance of `service`.
    ///
    /// # Errors
    /// - [`ResolveError::ServiceUnavailable`] if the registry lookup fails.
    /// - [`ResolveError::Connect`] if the chosen instance cannot be reached.
    pub async fn connect(&self, service: &str) -> Result<Box<dyn Connection>, ResolveError> {
        let addresses = self
            .registry
            .service_addresses(service)
            .await
            .map_err(|source| ResolveError::ServiceUnavailable {
                service: service.to_owned(),
                source: Some(source),
            })?;

        let address = pick(&addresses).ok_or_else(|| ResolveError::ServiceUnavailable {
            service: service.to_owned(),
            source: None,
        })?;
        tracing::debug!(service, address, candidates = addresses.len(), "resolved instance");

        self.connector
            .connect(address)
            .await
            .map_err(|source| ResolveError::Connect {
                service: service.to_owned(),
                address: address.to_owned(),
                source,
            })
    }
}

fn pick(addresses: &[String]) -> Option<&str> {
    addresses.choose(&mut rand::rng()).map(String::as_str)
}
