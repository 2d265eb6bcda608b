//! # Tabsling Queue
//!
//! The arbiter's tab-opening queue.
//!
//! ## Guarantees
//!
//! - Strict FIFO: URLs open in the order they were enqueued
//! - Single flight: at most one tab creation outstanding at any time
//! - Cancellation: clearing the queue drops everything not yet started;
//!   an open already in flight completes
//! - No retries: a failed open is logged and the next URL proceeds

pub mod error;
pub mod pending;
pub mod queue;
pub mod worker;

pub use error::QueueError;
pub use pending::{OpenSource, PendingOpen};
pub use queue::OpenQueue;
pub use tabsling_config::QueueConfig;
pub use worker::{OpenHandler, QueueProcessor};
