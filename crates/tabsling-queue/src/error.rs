//! Queue errors.

use thiserror::Error;

/// Queue error types.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Queue is full.
    #[error("Queue is full ({0} pending)")]
    QueueFull(usize),

    /// Opening a queued URL failed.
    #[error("Open failed for {url}: {reason}")]
    OpenFailed { url: String, reason: String },
}
