//! Page registry: the detectors of every open page, keyed by tab.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use tabsling_detector::InteractionDetector;
use tabsling_protocols::{MessagingError, Outcome, PageMessage, PageMessenger, TabId};

/// Detectors of open pages. Delivers arbiter messages to them.
#[derive(Default)]
pub(crate) struct PageRegistry {
    detectors: DashMap<TabId, InteractionDetector>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, tab: TabId, detector: InteractionDetector) {
        debug!("Detector attached to {}", tab);
        self.detectors.insert(tab, detector);
    }

    pub fn get(&self, tab: TabId) -> Option<InteractionDetector> {
        self.detectors.get(&tab).map(|d| d.value().clone())
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }
}

#[async_trait]
impl PageMessenger for PageRegistry {
    async fn pages(&self) -> Vec<TabId> {
        let mut tabs: Vec<_> = self.detectors.iter().map(|entry| *entry.key()).collect();
        tabs.sort();
        tabs
    }

    async fn send(&self, tab: TabId, message: PageMessage) -> Result<Outcome, MessagingError> {
        // Clone out of the map so no shard lock is held across the await.
        let detector = self
            .get(tab)
            .ok_or_else(|| MessagingError::NoReceiver(tab.to_string()))?;
        if !detector.is_attached() {
            return Err(MessagingError::NoReceiver(tab.to_string()));
        }
        Ok(detector.handle_message(message).await)
    }
}
