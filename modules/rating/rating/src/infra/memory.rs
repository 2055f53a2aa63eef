use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;
use rating_sdk::{Rating, RatingValue, RecordId, RecordType, UserId};

use crate::domain::repo::{RatingRepository, RepoError};

type RecordKey = (RecordType, RecordId);

/// Ratings kept in process memory. A record whose last rating is deleted
/// disappears entirely.
#[derive(Debug, Default)]
pub struct InMemoryRatingRepository {
    records: RwLock<HashMap<RecordKey, BTreeMap<UserId, RatingValue>>>,
}

impl InMemoryRatingRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RatingRepository for InMemoryRatingRepository {
    async fn get(
        &self,
        record_id: &RecordId,
        record_type: RecordType,
    ) -> Result<Vec<Rating>, RepoError> {
        let records = self.records.read();
        let by_user = records
            .get(&(record_type, record_id.clone()))
            .ok_or(RepoError::NotFound)?;
        Ok(by_user
            .iter()
            .map(|(user_id, value)| Rating {
                record_id: record_id.clone(),
                record_type,
                user_id: user_id.clone(),
                value: *value,
            })
            .collect())
    }

    async fn put(&self, rating: Rating) -> Result<(), RepoError> {
        self.records
            .write()
            .entry((rating.record_type, rating.record_id))
            .or_default()
            .insert(rating.user_id, rating.value);
        Ok(())
    }

    async fn delete(
        &self,
        record_id: &RecordId,
        record_type: RecordType,
        user_id: &UserId,
    ) -> Result<bool, RepoError> {
        let mut records = self.records.write();
        let key = (record_type, record_id.clone());
        let Some(by_user) = records.get_mut(&key) else {
            return Ok(false);
        };
        let removed = by_user.remove(user_id).is_some();
        if by_user.is_empty() {
            records.remove(&key);
        }
        Ok(removed)
    }
}
