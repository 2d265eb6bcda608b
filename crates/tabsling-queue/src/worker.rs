//! Single-flight queue processor.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::QueueError;
use crate::pending::PendingOpen;
use crate::queue::OpenQueue;

/// Performs the side effect for one queued entry.
#[async_trait]
pub trait OpenHandler: Send + Sync {
    /// Open one URL, returning once the host has completed the request.
    async fn open(&self, open: &PendingOpen) -> Result<(), QueueError>;

    /// Checked before every open. `false` discards that entry and the rest
    /// of the queue.
    async fn may_continue(&self) -> bool;
}

/// Drains an [`OpenQueue`] with at most one open outstanding.
///
/// Any number of callers may [`kick`](Self::kick) the processor; only one
/// drain loop runs at a time and later kicks return immediately.
pub struct QueueProcessor {
    queue: Arc<OpenQueue>,
    handler: Arc<dyn OpenHandler>,
    open_delay: Duration,
    draining: AtomicBool,
    opened: AtomicU64,
    failed: AtomicU64,
    discarded: AtomicU64,
}

impl QueueProcessor {
    /// Create a processor using the queue's configured inter-open delay.
    pub fn new(queue: Arc<OpenQueue>, handler: Arc<dyn OpenHandler>) -> Self {
        let open_delay = Duration::from_millis(queue.config().open_delay_ms);
        Self {
            queue,
            handler,
            open_delay,
            draining: AtomicBool::new(false),
            opened: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
        }
    }

    /// The queue being drained.
    pub fn queue(&self) -> &Arc<OpenQueue> {
        &self.queue
    }

    /// Whether a drain loop is active.
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::SeqCst)
    }

    /// Successful opens.
    pub fn opened(&self) -> u64 {
        self.opened.load(Ordering::SeqCst)
    }

    /// Failed opens.
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::SeqCst)
    }

    /// Entries dropped because processing was told to stop.
    pub fn discarded(&self) -> u64 {
        self.discarded.load(Ordering::SeqCst)
    }

    /// Start a drain in the background unless one is already running.
    pub fn kick(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        if self.is_draining() {
            return None;
        }
        let processor = Arc::clone(self);
        Some(tokio::spawn(async move { processor.drain().await }))
    }

    /// Process queued entries until the queue is empty or the handler
    /// says to stop.
    pub async fn drain(&self) {
        if !self.try_acquire() {
            return;
        }

        loop {
            while let Some(open) = self.queue.dequeue().await {
                if !self.handler.may_continue().await {
                    let dropped = 1 + self.queue.clear().await;
                    self.discarded.fetch_add(dropped as u64, Ordering::SeqCst);
                    info!("Processing stopped, discarded {} queued opens", dropped);
                    break;
                }

                self.process(open).await;
            }

            self.draining.store(false, Ordering::SeqCst);

            // An enqueue that raced with the release above would otherwise
            // wait for the next kick.
            if self.queue.is_empty().await || !self.try_acquire() {
                break;
            }
        }
    }

    fn try_acquire(&self) -> bool {
        self.draining
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    async fn process(&self, open: PendingOpen) {
        debug!("Opening {} (queued {:?} ago)", open.url, open.waited());

        match self.handler.open(&open).await {
            Ok(()) => {
                self.opened.fetch_add(1, Ordering::SeqCst);
            }
            Err(e) => {
                self.failed.fetch_add(1, Ordering::SeqCst);
                warn!("Failed to open {}: {}", open.url, e);
            }
        }

        if !self.open_delay.is_zero() {
            tokio::time::sleep(self.open_delay).await;
        }
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
