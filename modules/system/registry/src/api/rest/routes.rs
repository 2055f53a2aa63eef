use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::{Extension, Router};
use marquee_discovery::InMemoryRegistry;
use marquee_discovery::wire::routes;

use super::handlers;

/// REST routes of the registry service.
pub fn router(registry: Arc<InMemoryRegistry>) -> Router {
    Router::new()
        .route(
            routes::INSTANCE,
            put(handlers::register_instance).delete(handlers::deregister_instance),
        )
        .route(routes::HEARTBEAT, post(handlers::heartbeat))
        .route(routes::ADDRESSES, get(handlers::service_addresses))
        .layer(Extension(registry))
}
