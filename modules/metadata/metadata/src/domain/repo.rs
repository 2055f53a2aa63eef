use async_trait::async_trait;
use metadata_sdk::Metadata;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum RepoError {
    #[error("no record with id '{0}'")]
    NotFound(String),

    #[error("storage failure: {0}")]
    Storage(String),
}

/// Storage of metadata records, keyed by id.
#[async_trait]
pub trait MetadataRepository: Send + Sync {
    async fn get(&self, id: &str) -> Result<Metadata, RepoError>;

    /// Insert or replace the record for `metadata.id`.
    async fn put(&self, metadata: Metadata) -> Result<(), RepoError>;
}
