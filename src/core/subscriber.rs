//! Subscriber entity and the record storage abstraction beneath it

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Field under which a subscriber's email is stored in a [`Record`].
pub const EMAIL_KEY: &str = "email";

/// A flat field name to value mapping, the unit of persistence.
pub type Record = HashMap<String, String>;

/// An email address entitled to notifications. The address is an opaque key:
/// no case folding and no format validation happen here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subscriber {
    pub email: String,
}

impl Subscriber {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    pub fn to_record(&self) -> Record {
        HashMap::from([(EMAIL_KEY.to_string(), self.email.clone())])
    }

    /// Records without an email field map to an empty address.
    pub fn from_record(record: &Record) -> Self {
        Self::new(record.get(EMAIL_KEY).cloned().unwrap_or_default())
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage engine error: {0}")]
    Engine(#[from] fjall::Error),

    #[error("malformed stored record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("malformed record key: {0:?}")]
    MalformedKey(Vec<u8>),

    #[error("store at {} is in use by another process", .0.display())]
    Locked(std::path::PathBuf),
}

/// Append-only sequence of flat records. Iteration order is append order.
#[async_trait]
pub trait RecordStorage: Send + Sync {
    async fn append(&self, record: Record) -> Result<(), StorageError>;

    async fn all_records(&self) -> Result<Vec<Record>, StorageError>;
}
