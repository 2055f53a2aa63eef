use async_trait::async_trait;

use crate::RegistryError;

/// Directory of live service instances.
///
/// Implemented by [`crate::InMemoryRegistry`] for in-process use and by
/// [`crate::RemoteRegistry`] for a registry running in another process. The
/// resolver and the heartbeat only see this trait.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Insert or overwrite the record of `instance_id`, marking it live now.
    async fn register(
        &self,
        instance_id: &str,
        service: &str,
        address: &str,
    ) -> Result<(), RegistryError>;

    /// Remove the record of `instance_id`. Removing an absent record is not an error.
    async fn deregister(&self, instance_id: &str, service: &str) -> Result<(), RegistryError>;

    /// Mark `instance_id` live now. Fails with [`RegistryError::NotRegistered`]
    /// if the registry holds no record for it.
    async fn report_healthy_state(
        &self,
        instance_id: &str,
        service: &str,
    ) -> Result<(), RegistryError>;

    /// Addresses of all instances of `service` that reported within the
    /// liveness window. Never returns an empty list.
    async fn service_addresses(&self, service: &str) -> Result<Vec<String>, RegistryError>;
}
