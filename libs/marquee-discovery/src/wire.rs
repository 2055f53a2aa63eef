//! Wire contract shared by the registry service and [`crate::RemoteRegistry`].

use marquee_transport::encode_segment;
use serde::{Deserialize, Serialize};

/// Problem codes carried in error bodies.
pub mod codes {
    pub const SERVICE_UNKNOWN: &str = "REGISTRY_SERVICE_UNKNOWN";
    pub const NO_HEALTHY_INSTANCES: &str = "REGISTRY_NO_HEALTHY_INSTANCES";
    pub const NOT_REGISTERED: &str = "REGISTRY_NOT_REGISTERED";
    pub const INVALID_ARGUMENT: &str = "REGISTRY_INVALID_ARGUMENT";
    pub const BACKEND: &str = "REGISTRY_BACKEND";
}

/// Route patterns as mounted by the registry service.
pub mod routes {
    pub const INSTANCE: &str = "/registry/services/{service}/instances/{instance_id}";
    pub const HEARTBEAT: &str = "/registry/services/{service}/instances/{instance_id}/heartbeat";
    pub const ADDRESSES: &str = "/registry/services/{service}/addresses";
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterInstanceRequest {
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceAddresses {
    pub service: String,
    pub addresses: Vec<String>,
}

#[must_use]
pub fn instance_path(service: &str, instance_id: &str) -> String {
    format!(
        "/registry/services/{}/instances/{}",
        encode_segment(service),
        encode_segment(instance_id)
    )
}

#[must_use]
pub fn heartbeat_path(service: &str, instance_id: &str) -> String {
    format!("{}/heartbeat", instance_path(service, instance_id))
}

#[must_use]
pub fn addresses_path(service: &str) -> String {
    format!("/registry/services/{}/addresses", encode_segment(service))
}
