use std::sync::Arc;

use axum::routing::{get, put};
use axum::{Extension, Router};
use metadata_sdk::wire;

use super::handlers;
use crate::domain::service::MetadataService;

/// REST routes of the metadata service.
pub fn router(service: Arc<MetadataService>) -> Router {
    Router::new()
        .route(wire::GET_ROUTE, get(handlers::get_metadata))
        .route(wire::PUT_ROUTE, put(handlers::put_metadata))
        .layer(Extension(service))
}
