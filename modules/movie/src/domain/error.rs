use metadata_sdk::MetadataError;
use rating_sdk::RatingError;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// The movie has no metadata.
    #[error("movie '{0}' not found")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Metadata lookup failed for a reason other than a missing record.
    #[error(transparent)]
    Metadata(MetadataError),

    #[error(transparent)]
    Rating(#[from] RatingError),
}
