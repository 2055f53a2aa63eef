use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use marquee_errors::Problem;
use rating_sdk::wire::PutRatingRequest;
use rating_sdk::{Rating, RecordId, RecordType};

use super::error::controller_error_to_problem;
use crate::domain::controller::MovieController;
use crate::domain::error::ControllerError;
use crate::domain::model::MovieDetails;

/// Movie metadata with its aggregated rating
pub async fn get_movie(
    Extension(controller): Extension<Arc<MovieController>>,
    Path(id): Path<String>,
) -> Result<Json<MovieDetails>, Problem> {
    controller
        .get(&id)
        .await
        .map(Json)
        .map_err(|e| controller_error_to_problem(&e, &format!("/movie/{id}")))
}

/// Rate a record on behalf of a user
pub async fn put_rating(
    Extension(controller): Extension<Arc<MovieController>>,
    Path((record_type, record_id)): Path<(String, String)>,
    body: Result<Json<PutRatingRequest>, JsonRejection>,
) -> Result<StatusCode, Problem> {
    let instance = format!("/movie/rating/{record_type}/{record_id}");
    let Json(body) = body?;
    let record_type = record_type.parse::<RecordType>().map_err(|e| {
        controller_error_to_problem(&ControllerError::InvalidInput(e.to_string()), &instance)
    })?;
    let record_id = RecordId(record_id);
    let rating = Rating {
        record_id: record_id.clone(),
        record_type,
        user_id: body.user_id,
        value: body.value,
    };
    controller
        .put_rating(&record_id, record_type, &rating)
        .await
        .map_err(|e| controller_error_to_problem(&e, &instance))?;
    Ok(StatusCode::NO_CONTENT)
}
