//! Arbiter errors.

use tabsling_config::StorageError;
use tabsling_protocols::HostError;
use tabsling_queue::QueueError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArbiterError {
    #[error("Settings storage error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("Rejected settings update: {0}")]
    InvalidSettings(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let err: ArbiterError = HostError::Menu("duplicate id".to_string()).into();
        assert!(matches!(err, ArbiterError::Host(_)));
        assert!(err.to_string().contains("duplicate id"));

        let err: ArbiterError = QueueError::QueueFull(3).into();
        assert!(matches!(err, ArbiterError::Queue(_)));

        let err: ArbiterError = StorageError::Unavailable("locked".to_string()).into();
        assert!(err.to_string().starts_with("Settings storage error"));

        let err = ArbiterError::InvalidSettings("debounceMs must be greater than 0".to_string());
        assert!(err.to_string().contains("debounceMs"));
    }
}
