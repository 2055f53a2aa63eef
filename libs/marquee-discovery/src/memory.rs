//! In-process registry.
//!
//! Records are never expired eagerly: liveness is decided at read time by
//! comparing each record's last report against the liveness window. A record
//! that went silent is simply skipped by lookups until it reports again or is
//! removed by [`InMemoryRegistry::compact`].

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::time::Instant;

use crate::{Registry, RegistryError};

/// Default liveness window: an instance silent for longer is not returned by lookups.
pub const DEFAULT_LIVENESS_WINDOW: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
struct InstanceRecord {
    address: String,
    last_active: Instant,
}

/// service name -> instance id -> record.
///
/// A service entry survives the deregistration of its last instance, so a
/// service that was ever registered answers lookups with
/// [`RegistryError::NoHealthyInstances`] rather than
/// [`RegistryError::ServiceUnknown`].
type ServiceTable = HashMap<String, BTreeMap<String, InstanceRecord>>;

#[derive(Debug)]
pub struct InMemoryRegistry {
    services: RwLock<ServiceTable>,
    liveness_window: Duration,
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::with_liveness_window(DEFAULT_LIVENESS_WINDOW)
    }

    #[must_use]
    pub fn with_liveness_window(liveness_window: Duration) -> Self {
        Self {
            services: RwLock::new(HashMap::new()),
            liveness_window,
        }
    }

    #[must_use]
    pub fn liveness_window(&self) -> Duration {
        self.liveness_window
    }

    /// Insert or overwrite an instance record with `last_active = now`.
    ///
    /// # Errors
    /// [`RegistryError::InvalidArgument`] if any argument is empty.
    pub fn register_instance(
        &self,
        instance_id: &str,
        service: &str,
        address: &str,
    ) -> Result<(), RegistryError> {
        for (name, value) in [
            ("instance id", instance_id),
            ("service name", service),
            ("address", address),
        ] {
            if value.is_empty() {
                return Err(RegistryError::InvalidArgument(format!("{name} must not be empty")));
            }
        }

        let record = InstanceRecord {
            address: address.to_owned(),
            last_active: Instant::now(),
        };
        let previous = self
            .services
            .write()
            .entry(service.to_owned())
            .or_default()
            .insert(instance_id.to_owned(), record);

        if previous.is_none() {
            tracing::info!(service, instance_id, address, "instance registered");
        } else {
            tracing::debug!(service, instance_id, address, "instance re-registered");
        }
        Ok(())
    }

    /// Remove an instance record. Absent records are ignored.
    pub fn deregister_instance(&self, instance_id: &str, service: &str) {
        let removed = self
            .services
            .write()
            .get_mut(service)
            .and_then(|instances| instances.remove(instance_id));
        if removed.is_some() {
            tracing::info!(service, instance_id, "instance deregistered");
        }
    }

    /// Refresh `last_active` of an existing record. Never inserts.
    ///
    /// # Errors
    /// [`RegistryError::NotRegistered`] if there is no such record.
    pub fn heartbeat(&self, instance_id: &str, service: &str) -> Result<(), RegistryError> {
        let mut services = self.services.write();
        let record = services
            .get_mut(service)
            .and_then(|instances| instances.get_mut(instance_id))
            .ok_or_else(|| RegistryError::not_registered(service, instance_id))?;
        record.last_active = Instant::now();
        Ok(())
    }

    /// Addresses of the instances of `service` that reported within the window.
    ///
    /// # Errors
    /// - [`RegistryError::ServiceUnknown`] if `service` was never registered.
    /// - [`RegistryError::NoHealthyInstances`] if no instance is live.
    pub fn live_addresses(&self, service: &str) -> Result<Vec<String>, RegistryError> {
        let now = Instant::now();
        let services = self.services.read();
        let instances = services
            .get(service)
            .ok_or_else(|| RegistryError::service_unknown(service))?;

        let addresses: Vec<String> = instances
            .values()
            .filter(|record| self.is_live(record, now))
            .map(|record| record.address.clone())
            .collect();

        if addresses.is_empty() {
            return Err(RegistryError::no_healthy_instances(service));
        }
        Ok(addresses)
    }

    /// Drop records that are outside the liveness window. Returns how many
    /// were removed. Lookups do not depend on this being called.
    pub fn compact(&self) -> usize {
        let now = Instant::now();
        let mut services = self.services.write();
        let mut removed = 0;
        for instances in services.values_mut() {
            let before = instances.len();
            instances.retain(|_, record| self.is_live(record, now));
            removed += before - instances.len();
        }
        if removed > 0 {
            tracing::debug!(removed, "compacted stale instance records");
        }
        removed
    }

    /// Number of stored records for `service`, live or not.
    #[must_use]
    pub fn instance_count(&self, service: &str) -> usize {
        self.services.read().get(service).map_or(0, BTreeMap::len)
    }

    fn is_live(&self, record: &InstanceRecord, now: Instant) -> bool {
        now.saturating_duration_since(record.last_active) <= self.liveness_window
    }
}

#[async_trait]
impl Registry for InMemoryRegistry {
    async fn register(
        &self,
        instance_id: &str,
        service: &str,
        address: &str,
    ) -> Result<(), RegistryError> {
        self.register_instance(instance_id, service, address)
    }

    async fn deregister(&self, instance_id: &str, service: &str) -> Result<(), RegistryError> {
        self.deregister_instance(instance_id, service);
        Ok(())
    }

    async fn report_healthy_state(
        &self,
        instance_id: &str,
        service: &str,
    ) -> Result<(), RegistryError> {
        self.heartbeat(instance_id, service)
    }

    async fn service_addresses(&self, service: &str) -> Result<Vec<String>, RegistryError> {
        self.live_addresses(service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_of_unknown_service_fails() {
        let reg = InMemoryRegistry::new();
        assert_eq!(
            reg.live_addresses("rating"),
            Err(RegistryError::service_unknown("rating"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn registered_instance_is_returned() {
        let reg = InMemoryRegistry::new();
        reg.register_instance("rating-1", "rating", "10.0.0.1:8082").unwrap();
        assert_eq!(reg.live_addresses("rating").unwrap(), vec!["10.0.0.1:8082"]);
    }

    #[tokio::test(start_paused = true)]
    async fn register_overwrites_address() {
        let reg = InMemoryRegistry::new();
        reg.register_instance("rating-1", "rating", "10.0.0.1:8082").unwrap();
        reg.register_instance("rating-1", "rating", "10.0.0.2:8082").unwrap();
        assert_eq!(reg.live_addresses("rating").unwrap(), vec!["10.0.0.2:8082"]);
        assert_eq!(reg.instance_count("rating"), 1);
    }

    #[test]
    fn register_rejects_empty_arguments() {
        let reg = InMemoryRegistry::new();
        for (id, service, addr) in [("", "s", "a:1"), ("i", "", "a:1"), ("i", "s", "")] {
            assert!(matches!(
                reg.register_instance(id, service, addr),
                Err(RegistryError::InvalidArgument(_))
            ));
        }
        assert_eq!(reg.instance_count("s"), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn instance_is_live_within_window_and_stale_after() {
        let reg = InMemoryRegistry::new();
        reg.register_instance("metadata-1", "metadata", "10.0.0.1:8081").unwrap();

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(reg.live_addresses("metadata").unwrap(), vec!["10.0.0.1:8081"]);

        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(
            reg.live_addresses("metadata"),
            Err(RegistryError::no_healthy_instances("metadata"))
        );
        // Stale records are hidden, not removed.
        assert_eq!(reg.instance_count("metadata"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn heartbeat_extends_liveness() {
        let reg = InMemoryRegistry::new();
        reg.register_instance("metadata-1", "metadata", "10.0.0.1:8081").unwrap();
        for _ in 0..5 {
            tokio::time::advance(Duration::from_secs(3)).await;
            reg.heartbeat("metadata-1", "metadata").unwrap();
        }
        assert!(reg.live_addresses("metadata").is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn heartbeat_revives_stale_instance() {
        let reg = InMemoryRegistry::new();
        reg.register_instance("metadata-1", "metadata", "10.0.0.1:8081").unwrap();
        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(reg.live_addresses("metadata").is_err());
        reg.heartbeat("metadata-1", "metadata").unwrap();
        assert!(reg.live_addresses("metadata").is_ok());
    }

    #[test]
    fn heartbeat_for_unknown_instance_does_not_insert() {
        let reg = InMemoryRegistry::new();
        assert_eq!(
            reg.heartbeat("rating-1", "rating"),
            Err(RegistryError::not_registered("rating", "rating-1"))
        );
        assert_eq!(reg.live_addresses("rating"), Err(RegistryError::service_unknown("rating")));
    }

    #[tokio::test(start_paused = true)]
    async fn deregister_is_idempotent_and_keeps_service_known() {
        let reg = InMemoryRegistry::new();
        reg.deregister_instance("never", "rating");

        reg.register_instance("rating-1", "rating", "10.0.0.1:8082").unwrap();
        reg.deregister_instance("rating-1", "rating");
        reg.deregister_instance("rating-1", "rating");

        assert_eq!(
            reg.live_addresses("rating"),
            Err(RegistryError::no_healthy_instances("rating"))
        );
        assert_eq!(
            reg.heartbeat("rating-1", "rating"),
            Err(RegistryError::not_registered("rating", "rating-1"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn only_live_instances_are_returned() {
        let reg = InMemoryRegistry::new();
        reg.register_instance("rating-1", "rating", "10.0.0.1:8082").unwrap();
        tokio::time::advance(Duration::from_secs(4)).await;
        reg.register_instance("rating-2", "rating", "10.0.0.2:8082").unwrap();
        tokio::time::advance(Duration::from_secs(2)).await;

        assert_eq!(reg.live_addresses("rating").unwrap(), vec!["10.0.0.2:8082"]);
    }

    #[tokio::test(start_paused = true)]
    async fn compact_removes_only_stale_records() {
        let reg = InMemoryRegistry::new();
        reg.register_instance("rating-1", "rating", "10.0.0.1:8082").unwrap();
        tokio::time::advance(Duration::from_secs(6)).await;
        reg.register_instance("rating-2", "rating", "10.0.0.2:8082").unwrap();

        assert_eq!(reg.compact(), 1);
        assert_eq!(reg.instance_count("rating"), 1);
        assert_eq!(reg.live_addresses("rating").unwrap(), vec!["10.0.0.2:8082"]);
        assert_eq!(reg.compact(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_liveness_window() {
        let reg = InMemoryRegistry::with_liveness_window(Duration::from_millis(500));
        reg.register_instance("movie-1", "movie", "10.0.0.1:8083").unwrap();
        tokio::time::advance(Duration::from_millis(400)).await;
        assert!(reg.live_addresses("movie").is_ok());
        tokio::time::advance(Duration::from_millis(200)).await;
        assert!(reg.live_addresses("movie").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn trait_object_delegates_to_inherent_methods() {
        let reg: std::sync::Arc<dyn Registry> = std::sync::Arc::new(InMemoryRegistry::new());
        reg.register("rating-1", "rating", "10.0.0.1:8082").await.unwrap();
        reg.report_healthy_state("rating-1", "rating").await.unwrap();
        assert_eq!(reg.service_addresses("rating").await.unwrap().len(), 1);
        reg.deregister("rating-1", "rating").await.unwrap();
        reg.deregister("rating-1", "rating").await.unwrap();
        assert!(matches!(
            reg.service_addresses("rating").await,
            Err(RegistryError::NoHealthyInstances { .. })
        ));
    }
}
