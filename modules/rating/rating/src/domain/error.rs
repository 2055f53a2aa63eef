use rating_sdk::{RecordId, RecordType};

/// Domain-level errors for the rating service
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("no ratings for {record_type} '{record_id}'")]
    NotFound {
        record_id: RecordId,
        record_type: RecordType,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("internal error: {0}")]
    Internal(String),
}
