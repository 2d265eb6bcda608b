//! Settings persistence.
//!
//! Settings are stored as a flat JSON object keyed by the camelCase setting
//! names. Reads overlay whatever keys are stored on top of the caller's
//! defaults, so a store written by an older version still yields a complete
//! [`Settings`] value.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StorageError;
use crate::schema::{Settings, SettingsPatch};

/// Durable key-value settings store.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read settings, filling every missing key from `defaults`.
    async fn get(&self, defaults: &Settings) -> Result<Settings, StorageError>;

    /// Merge a partial update into the stored settings.
    async fn set(&self, patch: &SettingsPatch) -> Result<(), StorageError>;
}

fn overlay(defaults: &Settings, stored: &Map<String, Value>) -> Result<Settings, StorageError> {
    let mut merged = match serde_json::to_value(defaults)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in stored {
        merged.insert(key.clone(), value.clone());
    }
    let settings: Settings = serde_json::from_value(Value::Object(merged))?;
    Ok(settings.normalized())
}

fn merge_patch(stored: &mut Map<String, Value>, patch: &SettingsPatch) -> Result<(), StorageError> {
    if let Value::Object(entries) = serde_json::to_value(patch)? {
        for (key, value) in entries {
            stored.insert(key, value);
        }
    }
    Ok(())
}

/// In-memory settings store for testing.
pub struct MemorySettingsStore {
    entries: RwLock<Map<String, Value>>,
}

impl MemorySettingsStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Map::new()),
        }
    }

    /// Create a store pre-populated with raw stored keys.
    pub fn with_entries(entries: Map<String, Value>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl Default for MemorySettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, defaults: &Settings) -> Result<Settings, StorageError> {
        let entries = self.entries.read().await;
        overlay(defaults, &entries)
    }

    async fn set(&self, patch: &SettingsPatch) -> Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        merge_patch(&mut entries, patch)
    }
}

/// JSON file backed settings store.
///
/// A missing file reads as an empty store.
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    /// Create a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn read_entries(&self) -> Result<Map<String, Value>, StorageError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Settings file {:?} not found, using defaults", self.path);
                return Ok(Map::new());
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            other => Err(StorageError::Unavailable(format!(
                "expected a JSON object in {:?}, found {}",
                self.path, other
            ))),
        }
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn get(&self, defaults: &Settings) -> Result<Settings, StorageError> {
        let entries = self.read_entries().await?;
        overlay(defaults, &entries)
    }

    async fn set(&self, patch: &SettingsPatch) -> Result<(), StorageError> {
        let mut entries = self.read_entries().await?;
        merge_patch(&mut entries, patch)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(&Value::Object(entries))?;
        fs::write(&self.path, content).await?;
        debug!("Saved settings to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_memory_store_defaults_missing_keys() {
        let store = MemorySettingsStore::new();
        let settings = store.get(&Settings::default()).await.unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn test_memory_store_overlays_stored_keys() {
        let mut entries = Map::new();
        entries.insert("enabled".to_string(), json!(false));
        entries.insert("excludedDomains".to_string(), json!(["www.Ads.example"]));
        let store = MemorySettingsStore::with_entries(entries);

        let settings = store.get(&Settings::default()).await.unwrap();
        assert!(!settings.enabled);
        assert!(settings.excluded_domains.contains("ads.example"));
        assert_eq!(settings.click_time_ms, 300);
    }

    #[tokio::test]
    async fn test_memory_store_set_merges() {
        let store = MemorySettingsStore::new();
        store
            .set(&SettingsPatch {
                debounce_ms: Some(900),
                ..Default::default()
            })
            .await
            .unwrap();
        store.set(&SettingsPatch::default().with_enabled(false)).await.unwrap();

        let settings = store.get(&Settings::default()).await.unwrap();
        assert_eq!(settings.debounce_ms, 900);
        assert!(!settings.enabled);
    }

    #[tokio::test]
    async fn test_memory_store_malformed_value() {
        let mut entries = Map::new();
        entries.insert("debounceMs".to_string(), json!("soon"));
        let store = MemorySettingsStore::with_entries(entries);

        let result = store.get(&Settings::default()).await;
        assert!(matches!(result, Err(StorageError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_file_store_missing_file_reads_defaults() {
        let dir = TempDir::new().unwrap();
        let store = FileSettingsStore::new(dir.path().join("settings.json"));
        let settings = store.get(&Settings::default()).await.unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let store = FileSettingsStore::new(&path);

        store
            .set(&SettingsPatch {
                multi_url_support: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(path.exists());

        let reopened = FileSettingsStore::new(&path);
        let settings = reopened.get(&Settings::default()).await.unwrap();
        assert!(!settings.multi_url_support);
        assert!(settings.enabled);
    }

    #[tokio::test]
    async fn test_file_store_rejects_non_object() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let store = FileSettingsStore::new(&path);
        let result = store.get(&Settings::default()).await;
        assert!(matches!(result, Err(StorageError::Unavailable(_))));
    }
}
