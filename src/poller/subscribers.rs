//! Snapshot subscriber registry

use super::QuoteSnapshot;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;

/// Identifies one registered consumer
pub type SubscriptionId = Uuid;

/// A consumer's end of the snapshot feed
#[derive(Debug)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub updates: mpsc::Receiver<QuoteSnapshot>,
}

impl Subscription {
    /// Wait for the next snapshot; `None` once unsubscribed
    pub async fn recv(&mut self) -> Option<QuoteSnapshot> {
        self.updates.recv().await
    }
}

/// Fan-out of snapshots to bounded per-consumer channels
#[derive(Debug)]
pub(crate) struct Subscribers {
    senders: Mutex<HashMap<SubscriptionId, mpsc::Sender<QuoteSnapshot>>>,
    buffer: usize,
}

impl Subscribers {
    pub(crate) fn new(buffer: usize) -> Self {
        Self {
            senders: Mutex::new(HashMap::new()),
            buffer: buffer.max(1),
        }
    }

    // The map stays consistent even if a holder panicked mid-publish
    fn lock(&self) -> MutexGuard<'_, HashMap<SubscriptionId, mpsc::Sender<QuoteSnapshot>>> {
        self.senders.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn add(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(self.buffer);
        let id = Uuid::new_v4();
        self.lock().insert(id, tx);
        Subscription { id, updates: rx }
    }

    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        self.lock().remove(&id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    /// Deliver to every live subscriber without blocking
    ///
    /// Returns the number of subscribers that received the snapshot.
    pub(crate) fn publish(&self, snapshot: &QuoteSnapshot) -> usize {
        let mut delivered = 0;
        self.lock().retain(|id, tx| match tx.try_send(snapshot.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                tracing::warn!(subscription = %id, "Subscriber lagging, dropping snapshot");
                true
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(subscription = %id, "Subscriber dropped, removing");
                false
            }
        });
        delivered
    }
}
