//! Detector errors.

use tabsling_protocols::MessagingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error(transparent)]
    Messaging(#[from] MessagingError),

    #[error("Unexpected response to {0}")]
    UnexpectedResponse(&'static str),

    #[error("Detector is detached from its page")]
    Detached,
}

impl DetectorError {
    /// The host invalidated this page's extension context.
    pub fn is_context_invalidated(&self) -> bool {
        matches!(self, DetectorError::Messaging(e) if e.is_context_invalidated())
    }
}
