//! Host API errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Tab creation failed: {0}")]
    TabCreation(String),

    #[error("Context menu operation failed: {0}")]
    Menu(String),

    #[error("Script injection failed: {0}")]
    Injection(String),
}
