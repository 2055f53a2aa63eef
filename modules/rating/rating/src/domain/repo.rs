use async_trait::async_trait;
use rating_sdk::{Rating, RecordId, RecordType, UserId};

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum RepoError {
    #[error("no ratings stored for the record")]
    NotFound,

    #[error("storage failure: {0}")]
    Storage(String),
}

/// Storage of individual ratings, at most one per (record, user).
#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// All ratings of a record. [`RepoError::NotFound`] when there are none.
    async fn get(&self, record_id: &RecordId, record_type: RecordType)
    -> Result<Vec<Rating>, RepoError>;

    /// Insert or replace the rating of `rating.user_id` for its record.
    async fn put(&self, rating: Rating) -> Result<(), RepoError>;

    /// Remove one user's rating. Returns whether a rating was removed.
    async fn delete(
        &self,
        record_id: &RecordId,
        record_type: RecordType,
        user_id: &UserId,
    ) -> Result<bool, RepoError>;
}
