//! Tab-opening side of the queue.

use std::sync::Arc;

use async_trait::async_trait;
use tabsling_config::Settings;
use tabsling_protocols::{CreateTab, TabCreator};
use tabsling_queue::{OpenHandler, PendingOpen, QueueError};
use tokio::sync::RwLock;
use tracing::debug;

/// Creates one tab per queued URL, reading the live settings for each.
pub struct TabOpener {
    settings: Arc<RwLock<Settings>>,
    tabs: Arc<dyn TabCreator>,
}

impl TabOpener {
    pub fn new(settings: Arc<RwLock<Settings>>, tabs: Arc<dyn TabCreator>) -> Self {
        Self { settings, tabs }
    }
}

#[async_trait]
impl OpenHandler for TabOpener {
    async fn open(&self, open: &PendingOpen) -> Result<(), QueueError> {
        let active = self.settings.read().await.activate_new_tabs;
        let request = CreateTab {
            url: open.url.clone(),
            active,
        };

        let tab = self
            .tabs
            .create_tab(request)
            .await
            .map_err(|e| QueueError::OpenFailed {
                url: open.url.clone(),
                reason: e.to_string(),
            })?;
        debug!("Opened {} in {}", open.url, tab);
        Ok(())
    }

    async fn may_continue(&self) -> bool {
        self.settings.read().await.enabled
    }
}
