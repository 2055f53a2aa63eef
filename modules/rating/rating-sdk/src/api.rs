use async_trait::async_trait;

use crate::{Rating, RecordId, RecordType};

/// Contract for reading aggregated ratings and writing individual ones.
#[async_trait]
pub trait RatingClient: Send + Sync {
    /// Mean of all ratings of the record.
    async fn get_aggregated_rating(
        &self,
        record_id: &RecordId,
        record_type: RecordType,
    ) -> Result<f64, RatingError>;

    /// Store `rating` for the record, replacing the same user's previous one.
    async fn put_rating(
        &self,
        record_id: &RecordId,
        record_type: RecordType,
        rating: &Rating,
    ) -> Result<(), RatingError>;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RatingError {
    #[error("no ratings for {record_type} '{record_id}'")]
    NotFound {
        record_id: RecordId,
        record_type: RecordType,
    },

    /// The rating service rejected the request as malformed.
    #[error("rating rejected: {0}")]
    InvalidArgument(String),

    #[error("rating service unavailable: {0}")]
    Unavailable(String),
}

impl RatingError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
