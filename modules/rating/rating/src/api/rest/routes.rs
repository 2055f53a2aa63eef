use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};
use rating_sdk::wire;

use super::handlers;
use crate::domain::service::RatingService;

/// REST routes of the rating service.
pub fn router(service: Arc<RatingService>) -> Router {
    Router::new()
        .route(wire::EVENTS_ROUTE, post(handlers::apply_events))
        .route(
            wire::RECORD_ROUTE,
            get(handlers::get_rating).put(handlers::put_rating),
        )
        .layer(Extension(service))
}
