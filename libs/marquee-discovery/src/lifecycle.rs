use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{HeartbeatReporter, InstanceId, InstanceInfo, Registry, RegistryError};

/// A service instance registered with the registry and kept live by a
/// [`HeartbeatReporter`] until [`ServiceInstance::stop`].
pub struct ServiceInstance {
    registry: Arc<dyn Registry>,
    info: InstanceInfo,
    heartbeat: HeartbeatReporter,
}

impl std::fmt::Debug for ServiceInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceInstance")
            .field("info", &self.info)
            .field("heartbeat", &self.heartbeat)
            .finish_non_exhaustive()
    }
}

impl ServiceInstance {
    /// Generate an instance id, register `address` under `service` and start
    /// reporting every `heartbeat_interval`.
    ///
    /// # Errors
    /// Returns the registry error if the initial registration fails; no
    /// heartbeat is started in that case.
    pub async fn start(
        registry: Arc<dyn Registry>,
        service: &str,
        address: &str,
        heartbeat_interval: Duration,
        shutdown: &CancellationToken,
    ) -> Result<Self, RegistryError> {
        let info = InstanceInfo::new(InstanceId::generate(service), service, address);
        registry
            .register(info.id.as_str(), &info.service, &info.address)
            .await?;
        tracing::info!(service, instance_id = %info.id, address, "service instance registered");

        let heartbeat = HeartbeatReporter::spawn(
            registry.clone(),
            info.clone(),
            heartbeat_interval,
            shutdown.child_token(),
        );
        Ok(Self {
            registry,
            info,
            heartbeat,
        })
    }

    #[must_use]
    pub fn info(&self) -> &InstanceInfo {
        &self.info
    }

    #[must_use]
    pub fn id(&self) -> &InstanceId {
        &self.info.id
    }

    /// Stop the heartbeat, then deregister.
    ///
    /// # Errors
    /// Returns the registry error if deregistration fails. The heartbeat is
    /// stopped regardless.
    pub async fn stop(self) -> Result<(), RegistryError> {
        let Self {
            registry,
            info,
            heartbeat,
        } = self;
        heartbeat.stop().await;
        registry.deregister(info.id.as_str(), &info.service).await?;
        tracing::info!(service = %info.service, instance_id = %info.id, "service instance deregistered");
        Ok(())
    }
}
