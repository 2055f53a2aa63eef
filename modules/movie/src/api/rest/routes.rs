use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::routing::{get, put};
use axum::{Extension, Router};

use super::handlers;
use crate::domain::controller::MovieController;
use crate::limiter::{AdmissionLimiter, admission_control};

pub const MOVIE_ROUTE: &str = "/movie/{id}";
pub const RATING_ROUTE: &str = "/movie/rating/{record_type}/{record_id}";

/// REST routes of the movie service, every one behind `limiter`.
pub fn router(controller: Arc<MovieController>, limiter: Arc<AdmissionLimiter>) -> Router {
    Router::new()
        .route(MOVIE_ROUTE, get(handlers::get_movie))
        .route(RATING_ROUTE, put(handlers::put_rating))
        .layer(Extension(controller))
        .layer(from_fn_with_state(limiter, admission_control))
}
