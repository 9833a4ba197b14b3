//! Subscriber persistence over an abstract [`RecordStorage`].

pub mod disk;
pub mod memory;

use crate::core::{RecordStorage, StorageError, Subscriber};
use std::sync::Arc;
use thiserror::Error;

pub use disk::DiskStorage;
pub use memory::MemoryStorage;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot find subscriber by email")]
    CannotFindByEmail,

    #[error("cannot load subscribers: {0}")]
    CannotLoadUsers(#[source] StorageError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Append-only subscriber records. Uniqueness of emails is the caller's
/// concern; `add` never checks for an existing record.
#[derive(Clone)]
pub struct SubscriberStore {
    storage: Arc<dyn RecordStorage>,
}

impl SubscriberStore {
    pub fn new(storage: Arc<dyn RecordStorage>) -> Self {
        Self { storage }
    }

    pub async fn add(&self, subscriber: &Subscriber) -> Result<(), StoreError> {
        Ok(self.storage.append(subscriber.to_record()).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Subscriber, StoreError> {
        self.storage
            .all_records()
            .await?
            .iter()
            .map(Subscriber::from_record)
            .find(|subscriber| subscriber.email == email)
            .ok_or(StoreError::CannotFindByEmail)
    }

    pub async fn all(&self) -> Result<Vec<Subscriber>, StoreError> {
        let records = self
            .storage
            .all_records()
            .await
            .map_err(StoreError::CannotLoadUsers)?;
        Ok(records.iter().map(Subscriber::from_record).collect())
    }
}
