use axum::http::StatusCode;
use marquee_discovery::RegistryError;
use marquee_errors::Problem;

/// Map registry errors to HTTP problem responses.
///
/// The problem code is what `RemoteRegistry` maps back from, the status is
/// for everybody else.
pub fn registry_error_to_problem(err: &RegistryError, instance: &str) -> Problem {
    let (status, title) = match err {
        RegistryError::ServiceUnknown { .. } => (StatusCode::NOT_FOUND, "Service unknown"),
        RegistryError::NoHealthyInstances { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, "No healthy instances")
        }
        RegistryError::NotRegistered { .. } => (StatusCode::NOT_FOUND, "Instance not registered"),
        RegistryError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "Validation error"),
        RegistryError::Backend(msg) => {
            tracing::error!(error = %msg, "registry backend failure");
            (StatusCode::SERVICE_UNAVAILABLE, "Registry unavailable")
        }
    };
    let detail = match err {
        RegistryError::InvalidArgument(msg) => msg.clone(),
        other => other.to_string(),
    };
    let problem = Problem::coded(status, err.code(), title, detail);
    let trace_id = tracing::Span::current()
        .id()
        .map(|id| id.into_u64().to_string());
    marquee_errors::finalize(problem, instance, trace_id)
}
