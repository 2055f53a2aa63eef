use std::collections::HashMap;

use async_trait::async_trait;
use metadata_sdk::Metadata;
use parking_lot::RwLock;

use crate::domain::repo::{MetadataRepository, RepoError};

#[derive(Debug, Default)]
pub struct InMemoryMetadataRepository {
    records: RwLock<HashMap<String, Metadata>>,
}

impl InMemoryMetadataRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MetadataRepository for InMemoryMetadataRepository {
    async fn get(&self, id: &str) -> Result<Metadata, RepoError> {
        self.records
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| RepoError::NotFound(id.to_owned()))
    }

    async fn put(&self, metadata: Metadata) -> Result<(), RepoError> {
        self.records.write().insert(metadata.id.clone(), metadata);
        Ok(())
    }
}
