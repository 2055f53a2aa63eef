use std::sync::Arc;

use rating_sdk::{Rating, RatingEvent, RatingEventType, RecordId, RecordType};
use tracing::instrument;

use crate::domain::error::DomainError;
use crate::domain::repo::{RatingRepository, RepoError};

/// Mean of a record's ratings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    pub mean: f64,
    pub count: usize,
}

pub struct RatingService {
    repo: Arc<dyn RatingRepository>,
}

impl std::fmt::Debug for RatingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RatingService").finish_non_exhaustive()
    }
}

fn repo_error(e: RepoError, record_id: &RecordId, record_type: RecordType) -> DomainError {
    match e {
        RepoError::NotFound => DomainError::NotFound {
            record_id: record_id.clone(),
            record_type,
        },
        RepoError::Storage(msg) => DomainError::Internal(msg),
    }
}

fn mean(ratings: &[Rating]) -> Result<f64, DomainError> {
    let count = u32::try_from(ratings.len())
        .map_err(|_| DomainError::Internal("too many ratings to aggregate".to_owned()))?;
    let sum: f64 = ratings.iter().map(|r| f64::from(r.value)).sum();
    Ok(sum / f64::from(count))
}

fn validate_ids(record_id: &RecordId, user_id: Option<&str>) -> Result<(), DomainError> {
    if record_id.as_str().is_empty() {
        return Err(DomainError::InvalidInput("record_id must not be empty".to_owned()));
    }
    if user_id.is_some_and(str::is_empty) {
        return Err(DomainError::InvalidInput("user_id must not be empty".to_owned()));
    }
    Ok(())
}

impl RatingService {
    #[must_use]
    pub fn new(repo: Arc<dyn RatingRepository>) -> Self {
        Self { repo }
    }

    /// Arithmetic mean of all ratings of the record.
    ///
    /// # Errors
    /// [`DomainError::NotFound`] if the record has no ratings.
    #[instrument(skip(self))]
    pub async fn aggregated_rating(
        &self,
        record_id: &RecordId,
        record_type: RecordType,
    ) -> Result<Aggregate, DomainError> {
        validate_ids(record_id, None)?;
        let ratings = self
            .repo
            .get(record_id, record_type)
            .await
            .map_err(|e| repo_error(e, record_id, record_type))?;
        if ratings.is_empty() {
            return Err(DomainError::NotFound {
                record_id: record_id.clone(),
                record_type,
            });
        }
        Ok(Aggregate {
            mean: mean(&ratings)?,
            count: ratings.len(),
        })
    }

    /// Store a rating, replacing the same user's previous one.
    ///
    /// # Errors
    /// [`DomainError::InvalidInput`] on empty ids.
    #[instrument(skip(self, rating), fields(record_id = %rating.record_id, user_id = %rating.user_id))]
    pub async fn put_rating(&self, rating: Rating) -> Result<(), DomainError> {
        validate_ids(&rating.record_id, Some(rating.user_id.as_str()))?;
        let (record_id, record_type) = (rating.record_id.clone(), rating.record_type);
        self.repo
            .put(rating)
            .await
            .map_err(|e| repo_error(e, &record_id, record_type))
    }

    /// Apply events in order. The whole batch is validated before anything is
    /// applied. Returns the number of events applied.
    ///
    /// # Errors
    /// [`DomainError::InvalidInput`] if any event carries an empty id.
    #[instrument(skip(self, events), fields(events = events.len()))]
    pub async fn apply_events(&self, events: Vec<RatingEvent>) -> Result<usize, DomainError> {
        for event in &events {
            validate_ids(&event.record_id, Some(event.user_id.as_str()))?;
        }

        let total = events.len();
        for event in events {
            let (record_id, record_type) = (event.record_id.clone(), event.record_type);
            let result = match event.event_type {
                RatingEventType::Put => self
                    .repo
                    .put(Rating {
                        record_id: event.record_id,
                        record_type: event.record_type,
                        user_id: event.user_id,
                        value: event.value,
                    })
                    .await
                    .map(|()| true),
                RatingEventType::Delete => {
                    self.repo
                        .delete(&event.record_id, event.record_type, &event.user_id)
                        .await
                }
            };
            result.map_err(|e| repo_error(e, &record_id, record_type))?;
        }
        tracing::info!(applied = total, "rating events applied");
        Ok(total)
    }
}
