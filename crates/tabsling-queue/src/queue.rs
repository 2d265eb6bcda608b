//! FIFO open queue.

use std::collections::VecDeque;

use tokio::sync::RwLock;
use tracing::debug;

use crate::error::QueueError;
use crate::pending::PendingOpen;
use tabsling_config::QueueConfig;

/// First-in first-out queue of URLs awaiting tab creation.
///
/// Entries are never reordered. Processing lives in
/// [`QueueProcessor`](crate::worker::QueueProcessor).
pub struct OpenQueue {
    config: QueueConfig,
    pending: RwLock<VecDeque<PendingOpen>>,
}

impl OpenQueue {
    /// Create a new open queue.
    pub fn new(config: QueueConfig) -> Self {
        Self {
            config,
            pending: RwLock::new(VecDeque::new()),
        }
    }

    /// Queue configuration.
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Append one entry.
    pub async fn enqueue(&self, open: PendingOpen) -> Result<(), QueueError> {
        let mut pending = self.pending.write().await;
        if self.config.max_pending > 0 && pending.len() >= self.config.max_pending {
            return Err(QueueError::QueueFull(pending.len()));
        }

        debug!("Enqueueing {} ({:?})", open.url, open.source);
        pending.push_back(open);
        Ok(())
    }

    /// Append a batch in order, as one unit.
    ///
    /// Either every entry is queued or, when the batch would overflow the
    /// limit, none is.
    pub async fn enqueue_all(&self, opens: Vec<PendingOpen>) -> Result<usize, QueueError> {
        let mut pending = self.pending.write().await;
        if self.config.max_pending > 0 && pending.len() + opens.len() > self.config.max_pending {
            return Err(QueueError::QueueFull(pending.len()));
        }

        let count = opens.len();
        pending.extend(opens);
        debug!("Enqueued batch of {} (now {} pending)", count, pending.len());
        Ok(count)
    }

    /// Take the oldest entry.
    pub async fn dequeue(&self) -> Option<PendingOpen> {
        let mut pending = self.pending.write().await;
        pending.pop_front()
    }

    /// Drop every queued entry, returning how many were dropped.
    pub async fn clear(&self) -> usize {
        let mut pending = self.pending.write().await;
        let dropped = pending.len();
        pending.clear();
        dropped
    }

    /// Get queue length.
    pub async fn len(&self) -> usize {
        self.pending.read().await.len()
    }

    /// Check if queue is empty.
    pub async fn is_empty(&self) -> bool {
        self.pending.read().await.is_empty()
    }

    /// Queued URLs, oldest first.
    pub async fn urls(&self) -> Vec<String> {
        self.pending.read().await.iter().map(|p| p.url.clone()).collect()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
