use std::sync::Arc;

use metadata_sdk::{MetadataClient, MetadataError};
use rating_sdk::{Rating, RatingClient, RatingError, RecordId, RecordType};
use tracing::instrument;

use crate::domain::error::ControllerError;
use crate::domain::model::MovieDetails;

/// Aggregates metadata (required) and rating (best effort) of a movie.
///
/// Calls are sequential: the rating service is asked only once metadata is
/// known. Nothing is retried here.
pub struct MovieController {
    metadata: Arc<dyn MetadataClient>,
    rating: Arc<dyn RatingClient>,
}

impl std::fmt::Debug for MovieController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovieController").finish_non_exhaustive()
    }
}

impl MovieController {
    #[must_use]
    pub fn new(metadata: Arc<dyn MetadataClient>, rating: Arc<dyn RatingClient>) -> Self {
        Self { metadata, rating }
    }

    /// Metadata of movie `id` merged with its aggregated rating.
    ///
    /// # Errors
    /// - [`ControllerError::NotFound`] if the movie has no metadata; the
    ///   rating service is not called in that case.
    /// - [`ControllerError::Metadata`] for any other metadata failure.
    ///
    /// A missing or failing rating never fails the request.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<MovieDetails, ControllerError> {
        if id.is_empty() {
            return Err(ControllerError::InvalidInput("id must not be empty".to_owned()));
        }

        let metadata = self.metadata.get(id).await.map_err(|e| match e {
            MetadataError::NotFound(_) => ControllerError::NotFound(id.to_owned()),
            other => ControllerError::Metadata(other),
        })?;

        let rating = match self
            .rating
            .get_aggregated_rating(&RecordId::from(id), RecordType::Movie)
            .await
        {
            Ok(rating) => Some(rating),
            Err(RatingError::NotFound { .. }) => None,
            Err(e) => {
                tracing::warn!(error = %e, "rating lookup failed, answering without rating");
                None
            }
        };

        Ok(MovieDetails { rating, metadata })
    }

    /// Forward a user's rating to the rating service. Validation is left to
    /// the rating service.
    ///
    /// # Errors
    /// [`ControllerError::Rating`] with the rating service's error; a rejected
    /// rating surfaces as [`RatingError::InvalidArgument`].
    #[instrument(skip(self, rating), fields(user_id = %rating.user_id))]
    pub async fn put_rating(
        &self,
        record_id: &RecordId,
        record_type: RecordType,
        rating: &Rating,
    ) -> Result<(), ControllerError> {
        self.rating.put_rating(record_id, record_type, rating).await?;
        Ok(())
    }
}
