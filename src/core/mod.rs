//! Core business abstractions

pub mod config;
pub mod log;
pub mod mail;
pub mod rate;
pub mod subscriber;

// Re-export main types for cleaner imports
pub use mail::{MailConnector, MailError, MailSession};
pub use rate::{Rate, RateError, RateProvider};
pub use subscriber::{Record, RecordStorage, StorageError, Subscriber};
