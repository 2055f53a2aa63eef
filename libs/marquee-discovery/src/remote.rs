use std::sync::Arc;

use async_trait::async_trait;
use marquee_transport::{CallError, Connector, RemoteRequest, RemoteResponse};

use crate::wire::{self, RegisterInstanceRequest, ServiceAddresses, codes};
use crate::{Registry, RegistryError};

/// [`Registry`] backed by a registry service reachable at a fixed address.
///
/// Error responses are mapped back to [`RegistryError`] through their
/// problem code, so callers cannot tell this apart from the in-memory one.
#[derive(Clone)]
pub struct RemoteRegistry {
    address: String,
    connector: Arc<dyn Connector>,
}

impl std::fmt::Debug for RemoteRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteRegistry")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl RemoteRegistry {
    pub fn new(address: impl Into<String>, connector: Arc<dyn Connector>) -> Self {
        Self {
            address: address.into(),
            connector,
        }
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    async fn send(&self, request: RemoteRequest) -> Result<RemoteResponse, CallError> {
        let mut conn = self.connector.connect(&self.address).await?;
        conn.call(request).await
    }
}

fn map_error(err: &CallError, service: &str, instance_id: Option<&str>) -> RegistryError {
    let code = err.problem().map(|p| p.code.as_str());
    match code {
        Some(codes::SERVICE_UNKNOWN) => RegistryError::service_unknown(service),
        Some(codes::NO_HEALTHY_INSTANCES) => RegistryError::no_healthy_instances(service),
        Some(codes::NOT_REGISTERED) => {
            RegistryError::not_registered(service, instance_id.unwrap_or_default())
        }
        Some(codes::INVALID_ARGUMENT) => RegistryError::InvalidArgument(
            err.problem().map(|p| p.detail.clone()).unwrap_or_default(),
        ),
        _ => RegistryError::Backend(err.to_string()),
    }
}

#[async_trait]
impl Registry for RemoteRegistry {
    async fn register(
        &self,
        instance_id: &str,
        service: &str,
        address: &str,
    ) -> Result<(), RegistryError> {
        let body = RegisterInstanceRequest {
            address: address.to_owned(),
        };
        let request = RemoteRequest::put(wire::instance_path(service, instance_id))
            .with_json(&body)
            .map_err(|e| RegistryError::Backend(e.to_string()))?;
        self.send(request)
            .await
            .map_err(|e| map_error(&e, service, Some(instance_id)))?;
        Ok(())
    }

    async fn deregister(&self, instance_id: &str, service: &str) -> Result<(), RegistryError> {
        self.send(RemoteRequest::delete(wire::instance_path(service, instance_id)))
            .await
            .map_err(|e| map_error(&e, service, Some(instance_id)))?;
        Ok(())
    }

    async fn report_healthy_state(
        &self,
        instance_id: &str,
        service: &str,
    ) -> Result<(), RegistryError> {
        self.send(RemoteRequest::post(wire::heartbeat_path(service, instance_id)))
            .await
            .map_err(|e| map_error(&e, service, Some(instance_id)))?;
        Ok(())
    }

    async fn service_addresses(&self, service: &str) -> Result<Vec<String>, RegistryError> {
        let response = self
            .send(RemoteRequest::get(wire::addresses_path(service)))
            .await
            .map_err(|e| map_error(&e, service, None))?;
        let body: ServiceAddresses = response
            .json()
            .map_err(|e| RegistryError::Backend(e.to_string()))?;
        if body.addresses.is_empty() {
            return Err(RegistryError::no_healthy_instances(service));
        }
        Ok(body.addresses)
    }
}
