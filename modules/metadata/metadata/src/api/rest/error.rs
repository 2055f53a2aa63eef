use axum::http::StatusCode;
use marquee_errors::Problem;
use metadata_sdk::wire::codes;

use crate::domain::error::DomainError;

/// Map domain errors to HTTP problem responses
pub fn domain_error_to_problem(err: &DomainError, instance: &str) -> Problem {
    let problem = match err {
        DomainError::NotFound(id) => Problem::coded(
            StatusCode::NOT_FOUND,
            codes::NOT_FOUND,
            "Metadata not found",
            format!("no metadata for '{id}'"),
        ),
        DomainError::InvalidInput(msg) => Problem::coded(
            StatusCode::BAD_REQUEST,
            codes::INVALID_ARGUMENT,
            "Validation error",
            msg.clone(),
        ),
        DomainError::Internal(msg) => {
            tracing::error!(error = %msg, "metadata storage failure");
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
