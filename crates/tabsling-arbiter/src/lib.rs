//! # Tabsling Arbiter
//!
//! The privileged half of the intent pipeline. One [`IntentArbiter`] per
//! browser session owns the settings, filters intents through the
//! exclusion list and feeds a FIFO, single-flight tab-opening queue.
//!
//! ## Failure semantics
//!
//! - Nothing is retried
//! - Excluded or invalid URLs are dropped with a debug log
//! - A disabled extension enqueues nothing, and disabling drops whatever is
//!   still queued
//! - Storage failures fall back to default settings

pub mod arbiter;
pub mod broadcast;
pub mod client;
pub mod error;
pub mod exclusion;
pub mod host;
pub mod menus;
pub mod opener;

pub use arbiter::{ArbiterBuilder, IntentArbiter};
pub use broadcast::broadcast;
pub use client::LocalArbiterClient;
pub use error::ArbiterError;
pub use exclusion::{is_excluded, retain_allowed};
pub use host::{MemoryContextMenus, MemoryPages, RecordingInjector, RecordingTabCreator};
pub use menus::{OPEN_LINK_MENU_ID, OPEN_MULTIPLE_MENU_ID};
pub use opener::TabOpener;
