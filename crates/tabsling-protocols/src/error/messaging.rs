//! Privilege-boundary messaging errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MessagingError {
    /// The host tore down the page binding. Nothing sent from this context
    /// will ever be delivered again.
    #[error("Extension context invalidated")]
    ContextInvalidated,

    /// The counterpart (usually a closed page) is gone.
    #[error("Receiving end does not exist: {0}")]
    NoReceiver(String),

    #[error("Unexpected response to {action}")]
    UnexpectedResponse { action: &'static str },

    #[error("Transport error: {0}")]
    Transport(String),
}

impl MessagingError {
    /// Whether this error means the calling context is permanently unusable.
    pub fn is_context_invalidated(&self) -> bool {
        matches!(self, MessagingError::ContextInvalidated)
    }
}
