//! # Tabsling Config
//!
//! Settings and host configuration for the Tabsling intent pipeline.
//!
//! - [`Settings`]: the durable user settings owned by the arbiter
//! - [`SettingsPatch`]: partial update sent by the settings UI
//! - [`DetectorSettings`]: the subset mirrored into every page
//! - [`SettingsStore`]: persistence collaborator, with memory and file backends
//! - [`HostConfig`]: TOML configuration for the host binary

mod error;
mod loader;
mod schema;
mod store;
mod validator;

pub use error::{ConfigError, StorageError};
pub use loader::ConfigLoader;
pub use schema::*;
pub use store::{FileSettingsStore, MemorySettingsStore, SettingsStore};
pub use validator::{SettingsValidator, ValidationError, ValidationResult, ValidationWarning};
