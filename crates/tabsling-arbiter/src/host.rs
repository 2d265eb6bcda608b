//! In-memory host collaborators.
//!
//! Used by tests and by the `tabsling replay` command in place of a real
//! browser.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tabsling_protocols::{
    ContextMenuRegistry, CreateTab, HostError, MenuEntry, MessagingError, Outcome, PageMessage,
    PageMessenger, ScriptInjector, TabCreator, TabId,
};
use tracing::info;

/// Tab creator that records every request instead of opening anything.
pub struct RecordingTabCreator {
    created: Mutex<Vec<CreateTab>>,
    next_id: AtomicU64,
    latency: Duration,
    failing: HashSet<String>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingTabCreator {
    pub fn new() -> Self {
        Self {
            created: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            latency: Duration::ZERO,
            failing: HashSet::new(),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Take `latency` to complete each creation.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Fail creation for `url`.
    pub fn failing_on(mut self, url: impl Into<String>) -> Self {
        self.failing.insert(url.into());
        self
    }

    /// Successful creations, in order.
    pub fn created(&self) -> Vec<CreateTab> {
        self.created.lock().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.created.lock().iter().map(|t| t.url.clone()).collect()
    }

    /// Highest number of creations ever outstanding at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Default for RecordingTabCreator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TabCreator for RecordingTabCreator {
    async fn create_tab(&self, request: CreateTab) -> Result<TabId, HostError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(&request.url) {
            return Err(HostError::TabCreation(format!("refused {}", request.url)));
        }

        let tab = TabId(self.next_id.fetch_add(1, Ordering::SeqCst));
        info!(
            "Created {} for {}{}",
            tab,
            request.url,
            if request.active { " (active)" } else { "" }
        );
        self.created.lock().push(request);
        Ok(tab)
    }
}

/// Context-menu registry kept in a map.
#[derive(Default)]
pub struct MemoryContextMenus {
    entries: Mutex<BTreeMap<String, MenuEntry>>,
}

impl MemoryContextMenus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered entry ids, sorted.
    pub fn ids(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }

    pub fn is_visible(&self, id: &str) -> Option<bool> {
        self.entries.lock().get(id).map(|e| e.visible)
    }
}

#[async_trait]
impl ContextMenuRegistry for MemoryContextMenus {
    async fn remove_all(&self) -> Result<(), HostError> {
        self.entries.lock().clear();
        Ok(())
    }

    async fn create(&self, entry: MenuEntry) -> Result<(), HostError> {
        let mut entries = self.entries.lock();
        if entries.contains_key(&entry.id) {
            return Err(HostError::Menu(format!("duplicate id {}", entry.id)));
        }
        entries.insert(entry.id.clone(), entry);
        Ok(())
    }

    async fn set_visible(&self, id: &str, visible: bool) -> Result<(), HostError> {
        match self.entries.lock().get_mut(id) {
            Some(entry) => {
                entry.visible = visible;
                Ok(())
            }
            None => Err(HostError::Menu(format!("no entry {}", id))),
        }
    }
}

/// Page messenger that records deliveries. Tabs listed as unreachable fail
/// with `NoReceiver`.
#[derive(Default)]
pub struct MemoryPages {
    tabs: Mutex<Vec<TabId>>,
    unreachable: Mutex<HashSet<TabId>>,
    sent: Mutex<Vec<(TabId, PageMessage)>>,
}

impl MemoryPages {
    pub fn new(tabs: impl IntoIterator<Item = TabId>) -> Self {
        Self {
            tabs: Mutex::new(tabs.into_iter().collect()),
            ..Default::default()
        }
    }

    pub fn set_unreachable(&self, tab: TabId) {
        self.unreachable.lock().insert(tab);
    }

    /// Delivered messages, in order.
    pub fn sent(&self) -> Vec<(TabId, PageMessage)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl PageMessenger for MemoryPages {
    async fn pages(&self) -> Vec<TabId> {
        self.tabs.lock().clone()
    }

    async fn send(&self, tab: TabId, message: PageMessage) -> Result<Outcome, MessagingError> {
        if self.unreachable.lock().contains(&tab) {
            return Err(MessagingError::NoReceiver(tab.to_string()));
        }
        self.sent.lock().push((tab, message));
        Ok(Outcome::success())
    }
}

/// Script injector that records the tabs it was asked to inject into.
#[derive(Default)]
pub struct RecordingInjector {
    injected: Mutex<Vec<TabId>>,
    fail: AtomicBool,
}

impl RecordingInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later injection fail.
    pub fn fail_all(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn injected(&self) -> Vec<TabId> {
        self.injected.lock().clone()
    }
}

#[async_trait]
impl ScriptInjector for RecordingInjector {
    async fn inject_detector(&self, tab: TabId) -> Result<(), HostError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(HostError::Injection(format!("cannot script {}", tab)));
        }
        self.injected.lock().push(tab);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_tab_creator() {
        let tabs = RecordingTabCreator::new().failing_on("https://bad.example");
        let first = tabs
            .create_tab(CreateTab {
                url: "https://a.example".to_string(),
                active: false,
            })
            .await
            .unwrap();
        let bad = tabs
            .create_tab(CreateTab {
                url: "https://bad.example".to_string(),
                active: false,
            })
            .await;

        assert_eq!(first, TabId(1));
        assert!(bad.is_err());
        assert_eq!(tabs.urls(), vec!["https://a.example"]);
        assert_eq!(tabs.max_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_menu_duplicate_and_missing() {
        let menus = MemoryContextMenus::new();
        let entry = MenuEntry {
            id: "x".to_string(),
            title: "X".to_string(),
            contexts: vec![],
            visible: true,
        };
        menus.create(entry.clone()).await.unwrap();
        assert!(menus.create(entry).await.is_err());
        assert!(menus.set_visible("missing", true).await.is_err());
    }

    #[tokio::test]
    async fn test_memory_pages() {
        let pages = MemoryPages::new([TabId(1), TabId(2)]);
        pages.set_unreachable(TabId(2));

        let message = PageMessage::ExtensionStateChanged { enabled: false };
        assert!(pages.send(TabId(1), message.clone()).await.is_ok());
        let err = pages.send(TabId(2), message).await.unwrap_err();
        assert!(matches!(err, MessagingError::NoReceiver(_)));
        assert_eq!(pages.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_injector_failure() {
        let injector = RecordingInjector::new();
        injector.inject_detector(TabId(4)).await.unwrap();
        injector.fail_all();
        assert!(injector.inject_detector(TabId(5)).await.is_err());
        assert_eq!(injector.injected(), vec![TabId(4)]);
    }
}
