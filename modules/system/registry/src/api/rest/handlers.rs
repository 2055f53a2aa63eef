use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use marquee_discovery::InMemoryRegistry;
use marquee_discovery::wire::{self, RegisterInstanceRequest, ServiceAddresses};
use marquee_errors::Problem;

use super::error::registry_error_to_problem;

/// Register (or re-register) one instance of a service
pub async fn register_instance(
    Extension(registry): Extension<Arc<InMemoryRegistry>>,
    Path((service, instance_id)): Path<(String, String)>,
    body: Result<Json<RegisterInstanceRequest>, JsonRejection>,
) -> Result<StatusCode, Problem> {
    let Json(body) = body?;
    registry
        .register_instance(&instance_id, &service, &body.address)
        .map_err(|e| registry_error_to_problem(&e, &wire::instance_path(&service, &instance_id)))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove one instance; unknown instances are ignored
pub async fn deregister_instance(
    Extension(registry): Extension<Arc<InMemoryRegistry>>,
    Path((service, instance_id)): Path<(String, String)>,
) -> StatusCode {
    registry.deregister_instance(&instance_id, &service);
    StatusCode::NO_CONTENT
}

/// Refresh the liveness of a registered instance
pub async fn heartbeat(
    Extension(registry): Extension<Arc<InMemoryRegistry>>,
    Path((service, instance_id)): Path<(String, String)>,
) -> Result<StatusCode, Problem> {
    registry
        .heartbeat(&instance_id, &service)
        .map_err(|e| registry_error_to_problem(&e, &wire::heartbeat_path(&service, &instance_id)))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Addresses of the live instances of a service
pub async fn service_addresses(
    Extension(registry): Extension<Arc<InMemoryRegistry>>,
    Path(service): Path<String>,
) -> Result<Json<ServiceAddresses>, Problem> {
    let addresses = registry
        .live_addresses(&service)
        .map_err(|e| registry_error_to_problem(&e, &wire::addresses_path(&service)))?;
    Ok(Json(ServiceAddresses { service, addresses }))
}
