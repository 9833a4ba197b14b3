//! "Already subscribed" semantics over the subscriber store.

use crate::core::Subscriber;
use crate::store::{StoreError, SubscriberStore};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("email is already subscribed")]
    AlreadySubscribed,

    #[error("subscriber repository error: {0}")]
    Repository(#[source] StoreError),

    #[error("cannot load subscribers: {0}")]
    CannotLoadUsers(#[source] StoreError),
}

impl SubscriptionError {
    /// Expected, user-facing outcome rather than a system fault.
    pub fn is_conflict(&self) -> bool {
        matches!(self, SubscriptionError::AlreadySubscribed)
    }
}

pub struct SubscriptionRegistry {
    store: SubscriberStore,
    // Makes lookup-then-append atomic for callers sharing this registry.
    write_lock: Mutex<()>,
}

impl SubscriptionRegistry {
    pub fn new(store: SubscriberStore) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn subscribe(&self, subscriber: &Subscriber) -> Result<(), SubscriptionError> {
        let _guard = self.write_lock.lock().await;

        match self.store.find_by_email(&subscriber.email).await {
            Ok(_) => return Err(SubscriptionError::AlreadySubscribed),
            Err(StoreError::CannotFindByEmail) => {}
            Err(e) => return Err(SubscriptionError::Repository(e)),
        }

        self.store
            .add(subscriber)
            .await
            .map_err(SubscriptionError::Repository)?;
        info!(email = %subscriber.email, "Subscribed");
        Ok(())
    }

    pub async fn subscriptions(&self) -> Result<Vec<Subscriber>, SubscriptionError> {
        let subscribers = self
            .store
            .all()
            .await
            .map_err(SubscriptionError::CannotLoadUsers)?;
        debug!("Loaded {} subscribers", subscribers.len());
        Ok(subscribers)
    }
}
