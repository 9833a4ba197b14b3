use crate::core::{Record, RecordStorage, StorageError};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory record storage, lost on drop
#[derive(Default)]
pub struct MemoryStorage {
    records: Mutex<Vec<Record>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStorage for MemoryStorage {
    async fn append(&self, record: Record) -> Result<(), StorageError> {
        let mut records = self.records.lock().await;
        records.push(record);
        debug!("Memory APPEND, {} records", records.len());
        Ok(())
    }

    async fn all_records(&self) -> Result<Vec<Record>, StorageError> {
        Ok(self.records.lock().await.clone())
    }
}
