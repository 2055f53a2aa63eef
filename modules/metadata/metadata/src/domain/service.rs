use std::sync::Arc;

use metadata_sdk::Metadata;
use tracing::instrument;

use crate::domain::error::DomainError;
use crate::domain::repo::{MetadataRepository, RepoError};

pub struct MetadataService {
    repo: Arc<dyn MetadataRepository>,
}

impl std::fmt::Debug for MetadataService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataService").finish_non_exhaustive()
    }
}

impl From<RepoError> for DomainError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Storage(msg) => Self::Internal(msg),
        }
    }
}

impl MetadataService {
    #[must_use]
    pub fn new(repo: Arc<dyn MetadataRepository>) -> Self {
        Self { repo }
    }

    /// # Errors
    /// [`DomainError::NotFound`] if nothing is stored under `id`.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Metadata, DomainError> {
        if id.is_empty() {
            return Err(DomainError::InvalidInput("id must not be empty".to_owned()));
        }
        Ok(self.repo.get(id).await?)
    }

    /// # Errors
    /// [`DomainError::InvalidInput`] if the id or title is empty.
    #[instrument(skip(self, metadata), fields(id = %metadata.id))]
    pub async fn put(&self, metadata: Metadata) -> Result<(), DomainError> {
        if metadata.id.is_empty() {
            return Err(DomainError::InvalidInput("id must not be empty".to_owned()));
        }
        if metadata.title.is_empty() {
            return Err(DomainError::InvalidInput("title must not be empty".to_owned()));
        }
        self.repo.put(metadata).await?;
        tracing::debug!("metadata stored");
        Ok(())
    }
}
