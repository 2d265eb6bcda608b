//! Trace replay: run recorded page events through detectors and the
//! arbiter against an in-memory browser.
//!
//! A trace is a JSON document:
//!
//! ```json
//! {
//!   "settings": { "debounceMs": 200 },
//!   "pages": [
//!     { "tab": 1, "url": "https://news.example/", "dom": [
//!         { "tag": "body" },
//!         { "tag": "a", "attributes": { "href": "/story" }, "parent": 0 }
//!     ] }
//!   ],
//!   "steps": [
//!     { "step": "event", "tab": 1, "event": { "type": "pointerDown", "button": "secondary", "x": 5, "y": 5, "target": 1, "timeMs": 0 } },
//!     { "step": "event", "tab": 1, "event": { "type": "pointerUp", "button": "secondary", "x": 5, "y": 5, "target": 1, "timeMs": 80 } },
//!     { "step": "event", "tab": 1, "event": { "type": "contextMenu", "target": 1 } }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use tabsling_arbiter::{
    ArbiterError, IntentArbiter, LocalArbiterClient, MemoryContextMenus, RecordingInjector,
    RecordingTabCreator,
};
use tabsling_config::{HostConfig, MemorySettingsStore, SettingsPatch};
use tabsling_detector::{
    DetectorError, DomTree, EventDisposition, InteractionDetector, PageEvent, StaticPage,
};
use tabsling_protocols::{CreateTab, MenuClick, TabId};

use crate::pages::PageRegistry;

#[derive(Debug, Error)]
pub(crate) enum ReplayError {
    #[error("Cannot read trace {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed trace: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Trace refers to unknown tab {0}")]
    UnknownTab(u64),

    #[error(transparent)]
    Arbiter(#[from] ArbiterError),

    #[error("Detector failed to start: {0}")]
    Detector(#[from] DetectorError),
}

/// A recorded session.
#[derive(Debug, Deserialize)]
pub(crate) struct Trace {
    /// Applied through the arbiter before any page loads.
    #[serde(default)]
    pub settings: Option<SettingsPatch>,

    pub pages: Vec<TracePage>,

    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TracePage {
    pub tab: u64,
    pub url: String,
    #[serde(default)]
    pub dom: DomTree,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub(crate) enum Step {
    /// Feed one event to a page's detector.
    Event { tab: u64, event: PageEvent },

    /// Replace a page's text selection.
    Select { tab: u64, text: String },

    /// Let time pass.
    Wait { ms: u64 },

    /// Settings UI change.
    Settings { patch: SettingsPatch },

    /// Click on one of the extension's context-menu entries.
    MenuClick {
        menu: String,
        tab: u64,
        #[serde(default)]
        link: Option<String>,
        #[serde(default)]
        selection: Option<String>,
    },

    /// The extension was reloaded under the pages.
    Reload,
}

impl Trace {
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let content = std::fs::read_to_string(path).map_err(|source| ReplayError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// What a replay produced.
#[derive(Debug, Default)]
pub(crate) struct ReplayReport {
    /// Tabs created, in order.
    pub opened: Vec<CreateTab>,
    /// Disposition of every replayed event.
    pub dispositions: Vec<(TabId, EventDisposition)>,
    pub failed: u64,
}

/// In-memory browser session driven by a trace.
struct Session {
    arbiter: Arc<IntentArbiter>,
    client: Arc<LocalArbiterClient>,
    registry: Arc<PageRegistry>,
    tabs: Arc<RecordingTabCreator>,
    pages: HashMap<u64, Arc<StaticPage>>,
}

impl Session {
    async fn start(config: &HostConfig) -> Result<Self, ReplayError> {
        let tabs = Arc::new(RecordingTabCreator::new());
        let registry = Arc::new(PageRegistry::new());
        let arbiter = Arc::new(
            IntentArbiter::builder(
                Arc::new(MemorySettingsStore::new()),
                tabs.clone(),
                Arc::new(MemoryContextMenus::new()),
                registry.clone(),
            )
            .defaults(config.settings.clone())
            .queue_config(config.queue.clone())
            .injector(Arc::new(RecordingInjector::new()))
            .build(),
        );
        arbiter.on_installed().await?;

        Ok(Self {
            client: Arc::new(LocalArbiterClient::new(arbiter.clone())),
            arbiter,
            registry,
            tabs,
            pages: HashMap::new(),
        })
    }

    async fn open_page(&mut self, entry: TracePage) -> Result<(), ReplayError> {
        let tab = TabId(entry.tab);
        self.arbiter.on_tab_activated(tab).await;

        let page = Arc::new(StaticPage::new(entry.url, entry.dom));
        let detector = InteractionDetector::new(self.client.clone(), page.clone());
        detector.init().await?;

        self.registry.attach(tab, detector);
        self.pages.insert(entry.tab, page);
        Ok(())
    }

    fn detector(&self, tab: u64) -> Result<InteractionDetector, ReplayError> {
        self.registry
            .get(TabId(tab))
            .ok_or(ReplayError::UnknownTab(tab))
    }

    async fn settle(&self) {
        for tab in self.pages.keys() {
            if let Some(detector) = self.registry.get(TabId(*tab)) {
                detector.settle().await;
            }
        }
    }

    async fn step(&self, step: Step, report: &mut ReplayReport) -> Result<(), ReplayError> {
        match step {
            Step::Event { tab, event } => {
                let disposition = self.detector(tab)?.handle_event(event).await;
                debug!("{} {:?} -> {:?}", TabId(tab), event, disposition);
                report.dispositions.push((TabId(tab), disposition));
            }
            Step::Select { tab, text } => {
                let page = self.pages.get(&tab).ok_or(ReplayError::UnknownTab(tab))?;
                page.set_selection(text);
            }
            Step::Wait { ms } => {
                self.settle().await;
                tokio::time::sleep(Duration::from_millis(ms)).await;
            }
            Step::Settings { patch } => {
                self.arbiter.on_settings_changed(patch).await?;
            }
            Step::MenuClick {
                menu,
                tab,
                link,
                selection,
            } => {
                let click = MenuClick {
                    menu_id: menu,
                    tab: Some(TabId(tab)),
                    link_url: link,
                    selection_text: selection,
                };
                self.arbiter.on_context_menu_clicked(click).await?;
            }
            Step::Reload => {
                info!("Invalidating extension context");
                self.client.invalidate();
            }
        }
        Ok(())
    }

    /// Wait for pending selection checks and the open queue to finish.
    async fn finish(&self) {
        self.settle().await;
        let processor = self.arbiter.processor();
        while processor.is_draining() || !processor.queue().is_empty().await {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

/// Replay `trace` and report the tabs it opened.
pub(crate) async fn run(config: &HostConfig, trace: Trace) -> Result<ReplayReport, ReplayError> {
    let mut session = Session::start(config).await?;

    if let Some(patch) = trace.settings {
        session.arbiter.on_settings_changed(patch).await?;
    }
    for page in trace.pages {
        session.open_page(page).await?;
    }
    info!(
        "Replaying {} steps across {} pages",
        trace.steps.len(),
        session.registry.len()
    );

    let mut report = ReplayReport::default();
    for step in trace.steps {
        session.step(step, &mut report).await?;
    }
    session.finish().await;

    report.opened = session.tabs.created();
    report.failed = session.arbiter.processor().failed();
    Ok(report)
}

#[cfg(test)]
#[path = "replay_tests.rs"]
mod tests;
