use thiserror::Error;

use crate::wire::codes;

/// Errors returned by every [`crate::Registry`] implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No instance of this service was ever registered.
    #[error("service '{service}' is not registered")]
    ServiceUnknown { service: String },

    /// The service is known but no instance reported within the liveness window.
    #[error("service '{service}' has no healthy instances")]
    NoHealthyInstances { service: String },

    /// Heartbeat for an instance the registry does not hold. The caller has
    /// to register again; retrying the heartbeat will not help.
    #[error("instance '{instance_id}' of service '{service}' is not registered")]
    NotRegistered { service: String, instance_id: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The registry backend could not be reached or answered unexpectedly.
    #[error("registry backend unavailable: {0}")]
    Backend(String),
}

impl RegistryError {
    #[must_use]
    pub fn service_unknown(service: impl Into<String>) -> Self {
        Self::ServiceUnknown {
            service: service.into(),
        }
    }

    #[must_use]
    pub fn no_healthy_instances(service: impl Into<String>) -> Self {
        Self::NoHealthyInstances {
            service: service.into(),
        }
    }

    #[must_use]
    pub fn not_registered(service: impl Into<String>, instance_id: impl Into<String>) -> Self {
        Self::NotRegistered {
            service: service.into(),
            instance_id: instance_id.into(),
        }
    }

    /// Whether the same call may succeed later without any corrective action.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NoHealthyInstances { .. } | Self::Backend(_))
    }

    /// Problem code used on the wire for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ServiceUnknown { .. } => codes::SERVICE_UNKNOWN,
            Self::NoHealthyInstances { .. } => codes::NO_HEALTHY_INSTANCES,
            Self::NotRegistered { .. } => codes::NOT_REGISTERED,
            Self::InvalidArgument(_) => codes::INVALID_ARGUMENT,
            Self::Backend(_) => codes::BACKEND,
        }
    }
}
