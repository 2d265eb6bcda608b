//! Host binary configuration (logging, queue pacing, default settings).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::Settings;

/// Root host configuration, loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub queue: QueueConfig,

    /// Settings used when the store has nothing for a key.
    #[serde(default)]
    pub settings: Settings,

    /// JSON file backing the settings store. In-memory when unset.
    #[serde(default)]
    pub settings_path: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily rolling log files. Console only when unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

/// Tab-opening queue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Pause after each tab creation before the next one starts.
    #[serde(default = "default_open_delay_ms")]
    pub open_delay_ms: u64,

    /// Maximum queued URLs (0 = unlimited).
    #[serde(default)]
    pub max_pending: usize,
}

fn default_open_delay_ms() -> u64 {
    100
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            open_delay_ms: default_open_delay_ms(),
            max_pending: 0,
        }
    }
}
