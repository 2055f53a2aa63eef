use async_trait::async_trait;

use crate::Metadata;

/// Contract for reading and writing movie metadata.
#[async_trait]
pub trait MetadataClient: Send + Sync {
    /// Fetch the metadata of movie `id`.
    async fn get(&self, id: &str) -> Result<Metadata, MetadataError>;

    /// Store `metadata`, replacing any previous value for its id.
    async fn put(&self, metadata: &Metadata) -> Result<(), MetadataError>;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("metadata not found for '{0}'")]
    NotFound(String),

    /// Any failure other than a missing record: no live instance, transport
    /// error, unexpected answer.
    #[error("metadata service unavailable: {0}")]
    Unavailable(String),
}

impl MetadataError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
