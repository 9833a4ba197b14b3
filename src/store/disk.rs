use crate::core::{Record, RecordStorage, StorageError};
use async_trait::async_trait;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::fs::{File, TryLockError};
use std::path::Path;
use tokio::sync::Mutex;
use tracing::debug;

const LOCK_FILE: &str = "ratemail.lock";

/// Durable record storage in one fjall partition.
///
/// Keys are big-endian sequence numbers, so the partition's key order is the
/// append order. Values are JSON objects. A handle holds an exclusive lock on
/// the data directory until dropped, so no two handles allocate sequences from
/// the same keyspace.
pub struct DiskStorage {
    keyspace: Keyspace,
    partition: PartitionHandle,
    // Serializes sequence allocation between appends on this handle.
    append_lock: Mutex<()>,
    // Declared last so the keyspace is closed before the lock is released.
    _dir_lock: File,
}

impl DiskStorage {
    pub fn open(path: &Path, name: &str) -> Result<Self, StorageError> {
        std::fs::create_dir_all(path)?;
        let dir_lock = lock_data_dir(path)?;

        let keyspace = Config::new(path).open()?;
        let partition = keyspace.open_partition(name, PartitionCreateOptions::default())?;
        debug!("Opened record partition '{}' at {}", name, path.display());
        Ok(Self {
            keyspace,
            partition,
            append_lock: Mutex::new(()),
            _dir_lock: dir_lock,
        })
    }

    fn next_sequence(&self) -> Result<u64, StorageError> {
        match self.partition.last_key_value()? {
            Some((key, _)) => decode_sequence(&key)
                .map(|seq| seq + 1)
                .ok_or_else(|| StorageError::MalformedKey(key.to_vec())),
            None => Ok(0),
        }
    }
}

fn lock_data_dir(path: &Path) -> Result<File, StorageError> {
    let lock_path = path.join(LOCK_FILE);
    let file = File::options()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)?;
    match file.try_lock() {
        Ok(()) => Ok(file),
        Err(TryLockError::WouldBlock) => Err(StorageError::Locked(path.to_path_buf())),
        Err(TryLockError::Error(e)) => Err(e.into()),
    }
}

fn decode_sequence(key: &[u8]) -> Option<u64> {
    let bytes: [u8; 8] = key.try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}

#[async_trait]
impl RecordStorage for DiskStorage {
    async fn append(&self, record: Record) -> Result<(), StorageError> {
        let _guard = self.append_lock.lock().await;

        let sequence = self.next_sequence()?;
        let value = serde_json::to_vec(&record)?;
        self.partition.insert(sequence.to_be_bytes().to_vec(), value)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Disk APPEND at sequence {}", sequence);
        Ok(())
    }

    async fn all_records(&self) -> Result<Vec<Record>, StorageError> {
        let mut records = Vec::new();
        for item in self.partition.iter() {
            let (_, value) = item?;
            records.push(serde_json::from_slice(&value)?);
        }
        debug!("Disk READ, {} records", records.len());
        Ok(records)
    }
}
