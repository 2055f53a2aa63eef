use axum::http::StatusCode;
use marquee_errors::Problem;
use metadata_sdk::MetadataError;
use rating_sdk::RatingError;

use crate::domain::error::ControllerError;

pub mod codes {
    pub const NOT_FOUND: &str = "MOVIE_NOT_FOUND";
    pub const INVALID_ARGUMENT: &str = "MOVIE_INVALID_ARGUMENT";
    pub const UPSTREAM_UNAVAILABLE: &str = "MOVIE_UPSTREAM_UNAVAILABLE";
}

fn not_found(detail: String) -> Problem {
    Problem::coded(StatusCode::NOT_FOUND, codes::NOT_FOUND, "Movie not found", detail)
}

fn unavailable(detail: String) -> Problem {
    Problem::coded(
        StatusCode::SERVICE_UNAVAILABLE,
        codes::UPSTREAM_UNAVAILABLE,
        "Upstream service unavailable",
        detail,
    )
}

/// Map controller errors to HTTP problem responses
pub fn controller_error_to_problem(err: &ControllerError, instance: &str) -> Problem {
    let problem = match err {
        ControllerError::NotFound(_)
        | ControllerError::Metadata(MetadataError::NotFound(_))
        | ControllerError::Rating(RatingError::NotFound { .. }) => not_found(err.to_string()),
        ControllerError::InvalidInput(msg)
        | ControllerError::Rating(RatingError::InvalidArgument(msg)) => Problem::coded(
            StatusCode::BAD_REQUEST,
            codes::INVALID_ARGUMENT,
            "Validation error",
            msg.clone(),
        ),
        ControllerError::Metadata(MetadataError::Unavailable(_))
        | ControllerError::Rating(RatingError::Unavailable(_)) => {
            tracing::warn!(error = %err, "upstream call failed");
            unavailable(err.to_string())
        }
    };
    let trace_id = tracing::Span::current()
        .id()
        .map(|id| id.into_u64().to_string());
    marquee_errors::finalize(problem, instance, trace_id)
}
