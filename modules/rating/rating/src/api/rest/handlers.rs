use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use marquee_errors::Problem;
use rating_sdk::wire::{self, AggregatedRating, EventsApplied, PutRatingRequest};
use rating_sdk::{Rating, RatingEvent, RecordId, RecordType};

use super::error::domain_error_to_problem;
use crate::domain::error::DomainError;
use crate::domain::service::RatingService;

fn parse_record(record_type: &str, record_id: String) -> Result<(RecordId, RecordType), DomainError> {
    let record_type = record_type
        .parse::<RecordType>()
        .map_err(|e| DomainError::InvalidInput(e.to_string()))?;
    Ok((RecordId(record_id), record_type))
}

/// Aggregated rating of one record
pub async fn get_rating(
    Extension(svc): Extension<Arc<RatingService>>,
    Path((record_type, record_id)): Path<(String, String)>,
) -> Result<Json<AggregatedRating>, Problem> {
    let instance = format!("/rating/{record_type}/{record_id}");
    let (record_id, record_type) =
        parse_record(&record_type, record_id).map_err(|e| domain_error_to_problem(&e, &instance))?;
    let aggregate = svc
        .aggregated_rating(&record_id, record_type)
        .await
        .map_err(|e| domain_error_to_problem(&e, &instance))?;
    Ok(Json(AggregatedRating {
        record_id,
        record_type,
        rating: aggregate.mean,
        count: aggregate.count,
    }))
}

/// Create or replace one user's rating of a record
pub async fn put_rating(
    Extension(svc): Extension<Arc<RatingService>>,
    Path((record_type, record_id)): Path<(String, String)>,
    body: Result<Json<PutRatingRequest>, JsonRejection>,
) -> Result<StatusCode, Problem> {
    let instance = format!("/rating/{record_type}/{record_id}");
    let Json(body) = body?;
    let (record_id, record_type) =
        parse_record(&record_type, record_id).map_err(|e| domain_error_to_problem(&e, &instance))?;
    svc.put_rating(Rating {
        record_id,
        record_type,
        user_id: body.user_id,
        value: body.value,
    })
    .await
    .map_err(|e| domain_error_to_problem(&e, &instance))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Apply a batch of rating events
pub async fn apply_events(
    Extension(svc): Extension<Arc<RatingService>>,
    body: Result<Json<Vec<RatingEvent>>, JsonRejection>,
) -> Result<Json<EventsApplied>, Problem> {
    let Json(events) = body?;
    let applied = svc
        .apply_events(events)
        .await
        .map_err(|e| domain_error_to_problem(&e, wire::EVENTS_ROUTE))?;
    Ok(Json(EventsApplied { applied }))
}
