use std::time::Duration;

use http::StatusCode;
use marquee_errors::Problem;
use thiserror::Error;

/// Failure of a remote call, as seen by the caller.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CallError {
    /// TCP connection could not be established
    #[error("connect to {address} failed: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("connect to {address} timed out after {timeout:?}")]
    ConnectTimeout { address: String, timeout: Duration },

    /// The whole call (send + receive body) exceeded the call timeout
    #[error("call timed out after {0:?}")]
    Timeout(Duration),

    /// HTTP protocol or I/O failure on an established connection
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The remote has no such entity (HTTP 404)
    #[error("not found: {}", problem_detail(.problem.as_deref()))]
    NotFound { problem: Option<Box<Problem>> },

    /// Any other non-2xx answer
    #[error("remote returned {status}: {}", problem_detail(.problem.as_deref()))]
    Status {
        status: StatusCode,
        problem: Option<Box<Problem>>,
    },

    #[error("failed to build request: {0}")]
    RequestBuild(#[from] http::Error),

    /// Request or response body was not valid JSON for the expected type
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

fn problem_detail(problem: Option<&Problem>) -> &str {
    problem.map_or("<no details>", |p| p.detail.as_str())
}

impl CallError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The problem body returned by the remote, if any.
    #[must_use]
    pub fn problem(&self) -> Option<&Problem> {
        match self {
            Self::NotFound { problem } | Self::Status { problem, .. } => problem.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of a remote error answer.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Classify an error answer.
    pub(crate) fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let problem = serde_json::from_slice::<Problem>(body).ok().map(Box::new);
        if status == StatusCode::NOT_FOUND {
            Self::NotFound { problem }
        } else {
            Self::Status { status, problem }
        }
    }
}

impl From<hyper::Error> for CallError {
    fn from(err: hyper::Error) -> Self {
        CallError::Transport(Box::new(err))
    }
}
