use axum::http::StatusCode;
use marquee_errors::Problem;
use rating_sdk::wire::codes;

use crate::domain::error::DomainError;

/// Map domain errors to HTTP problem responses
pub fn domain_error_to_problem(err: &DomainError, instance: &str) -> Problem {
    let problem = match err {
        DomainError::NotFound {
            record_id,
            record_type,
        } => Problem::coded(
            StatusCode::NOT_FOUND,
            codes::NOT_FOUND,
            "Rating not found",
            format!("no ratings for {record_type} '{record_id}'"),
        ),
        DomainError::InvalidInput(msg) => Problem::coded(
            StatusCode::BAD_REQUEST,
            codes::INVALID_ARGUMENT,
            "Validation error",
            msg.clone(),
        ),
        DomainError::Internal(msg) => {
            tracing::error!(error = %msg, "rating storage failure");
            Problem::coded(
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::INTERNAL,
                "Internal server error",
                "storage failure",
            )
        }
    };
    let trace_id = tracing::Span::current()
        .id()
        .map(|id| id.into_u64().to_string());
    marquee_errors::finalize(problem, instance, trace_id)
}
