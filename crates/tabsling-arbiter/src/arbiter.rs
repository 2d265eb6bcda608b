//! The intent arbiter.
//!
//! Owns the durable settings, decides which intents become tab openings and
//! feeds the single-flight open queue. It is the only component that
//! creates tabs.

use std::sync::Arc;

use tabsling_config::{
    DetectorSettings, QueueConfig, Settings, SettingsDelta, SettingsPatch, SettingsStore,
    SettingsValidator,
};
use tabsling_lexer::{extract_candidates, is_candidate_url};
use tabsling_protocols::{
    ContextMenuRegistry, DirectClickVerdict, ExtensionState, Intent, LinkVerdict, MenuClick,
    Outcome, PageMessage, PageMessenger, Request, Response, ScriptInjector, SelectionVerdict,
    TabCreator, TabId,
};
use tabsling_queue::{OpenQueue, OpenSource, PendingOpen, QueueProcessor};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::broadcast::broadcast;
use crate::error::ArbiterError;
use crate::exclusion::{is_excluded, retain_allowed};
use crate::menus::{OPEN_LINK_MENU_ID, OPEN_MULTIPLE_MENU_ID, register_menus, update_visibility};
use crate::opener::TabOpener;

/// Builder for [`IntentArbiter`].
pub struct ArbiterBuilder {
    store: Arc<dyn SettingsStore>,
    tabs: Arc<dyn TabCreator>,
    menus: Arc<dyn ContextMenuRegistry>,
    pages: Arc<dyn PageMessenger>,
    injector: Option<Arc<dyn ScriptInjector>>,
    defaults: Settings,
    queue: QueueConfig,
}

impl ArbiterBuilder {
    /// Settings used for keys the store does not have.
    pub fn defaults(mut self, defaults: Settings) -> Self {
        self.defaults = defaults.normalized();
        self
    }

    pub fn queue_config(mut self, config: QueueConfig) -> Self {
        self.queue = config;
        self
    }

    pub fn injector(mut self, injector: Arc<dyn ScriptInjector>) -> Self {
        self.injector = Some(injector);
        self
    }

    pub fn build(self) -> IntentArbiter {
        let settings = Arc::new(RwLock::new(self.defaults.clone()));
        let queue = Arc::new(OpenQueue::new(self.queue));
        let opener = Arc::new(TabOpener::new(settings.clone(), self.tabs));
        let processor = Arc::new(QueueProcessor::new(queue, opener));

        IntentArbiter {
            settings,
            defaults: self.defaults,
            store: self.store,
            menus: self.menus,
            pages: self.pages,
            injector: self.injector,
            processor,
        }
    }
}

/// Privileged decision maker for one browser session.
pub struct IntentArbiter {
    settings: Arc<RwLock<Settings>>,
    defaults: Settings,
    store: Arc<dyn SettingsStore>,
    menus: Arc<dyn ContextMenuRegistry>,
    pages: Arc<dyn PageMessenger>,
    injector: Option<Arc<dyn ScriptInjector>>,
    processor: Arc<QueueProcessor>,
}

impl IntentArbiter {
    pub fn builder(
        store: Arc<dyn SettingsStore>,
        tabs: Arc<dyn TabCreator>,
        menus: Arc<dyn ContextMenuRegistry>,
        pages: Arc<dyn PageMessenger>,
    ) -> ArbiterBuilder {
        ArbiterBuilder {
            store,
            tabs,
            menus,
            pages,
            injector: None,
            defaults: Settings::default(),
            queue: QueueConfig::default(),
        }
    }

    /// Snapshot of the effective settings.
    pub async fn settings(&self) -> Settings {
        self.settings.read().await.clone()
    }

    pub fn queue(&self) -> &Arc<OpenQueue> {
        self.processor.queue()
    }

    pub fn processor(&self) -> &Arc<QueueProcessor> {
        &self.processor
    }

    /// Extension installed or updated: load settings and register menus.
    pub async fn on_installed(&self) -> Result<(), ArbiterError> {
        let settings = self.reload_settings().await;
        register_menus(self.menus.as_ref(), &settings).await?;
        info!(
            "Installed (enabled: {}, multi-URL: {})",
            settings.enabled, settings.multi_url_support
        );
        Ok(())
    }

    /// Browser started with the extension already installed.
    pub async fn on_startup(&self) -> Settings {
        self.reload_settings().await
    }

    /// Re-read settings from the store. Storage failures fall back to the
    /// defaults.
    pub async fn reload_settings(&self) -> Settings {
        let loaded = match self.store.get(&self.defaults).await {
            Ok(settings) if SettingsValidator::validate(&settings).is_valid() => settings,
            Ok(_) => {
                warn!("Stored settings are invalid, using defaults");
                self.defaults.clone()
            }
            Err(e) => {
                warn!("Failed to load settings, using defaults: {}", e);
                self.defaults.clone()
            }
        };
        *self.settings.write().await = loaded.clone();
        loaded
    }

    /// Merge a partial update, persist it and push the result to every page.
    ///
    /// A patch that would leave a changed key invalid is rejected whole and
    /// nothing is stored or broadcast.
    pub async fn on_settings_changed(
        &self,
        patch: SettingsPatch,
    ) -> Result<SettingsDelta, ArbiterError> {
        let (delta, settings) = {
            let mut current = self.settings.write().await;
            let mut candidate = current.clone();
            let delta = candidate.apply(&patch);

            let rejected: Vec<String> = SettingsValidator::validate(&candidate)
                .errors
                .into_iter()
                .filter(|e| delta.changed_keys.iter().any(|key| *key == e.path))
                .map(|e| e.message)
                .collect();
            if !rejected.is_empty() {
                return Err(ArbiterError::InvalidSettings(rejected.join("; ")));
            }

            *current = candidate.clone();
            (delta, candidate)
        };
        if delta.is_empty() {
            return Ok(delta);
        }
        if settings.debug_mode {
            debug!("Settings changed: {:?}", delta.changed_keys);
        }

        if let Err(e) = self.store.set(&patch).await {
            warn!("Failed to persist settings: {}", e);
        }

        if let Some(enabled) = delta.enabled_transition {
            let dropped = self.queue().clear().await;
            info!(
                "Extension {} ({} queued opens dropped)",
                if enabled { "enabled" } else { "disabled" },
                dropped
            );
        }

        if delta.multi_url_changed {
            if let Err(e) = register_menus(self.menus.as_ref(), &settings).await {
                warn!("Failed to re-register context menus: {}", e);
            }
        }

        if let Some(enabled) = delta.enabled_transition {
            broadcast(
                self.pages.as_ref(),
                &PageMessage::ExtensionStateChanged { enabled },
            )
            .await;
        }
        broadcast(
            self.pages.as_ref(),
            &PageMessage::AdvancedSettingsUpdated {
                settings: settings.detector_settings(),
            },
        )
        .await;

        Ok(delta)
    }

    /// Answer one request from a detector or the settings UI.
    pub async fn handle_request(&self, request: Request) -> Response {
        match request {
            Request::GetExtensionState => Response::State(ExtensionState {
                enabled: self.settings.read().await.enabled,
            }),
            Request::GetAdvancedSettings => Response::Settings(self.detector_settings().await),
            Request::ShouldOpenLink { url } => Response::Link(self.should_open_link(&url).await),
            Request::DirectLinkClick { url } => self.on_intent(Intent::LinkClick(url)).await,
            Request::CheckSelection { text } => self.on_intent(Intent::SelectionCheck(text)).await,
            Request::OpenMultipleUrls { text } => self.on_intent(Intent::MultiUrlOpen(text)).await,
            Request::SettingsUpdated { settings } => match self.on_settings_changed(settings).await {
                Ok(_) => Response::Outcome(Outcome::success()),
                Err(e) => {
                    warn!("{}", e);
                    Response::Outcome(Outcome::failure())
                }
            },
        }
    }

    /// Decide what to do with a classified intent.
    pub async fn on_intent(&self, intent: Intent) -> Response {
        match intent {
            Intent::LinkClick(url) => Response::DirectClick(self.link_click(url).await),
            Intent::SelectionCheck(text) => Response::Selection(self.check_selection(&text).await),
            Intent::MultiUrlOpen(text) => Response::Outcome(self.open_multiple(&text).await),
        }
    }

    pub async fn detector_settings(&self) -> DetectorSettings {
        self.settings.read().await.detector_settings()
    }

    /// Whether a link click on `url` would be intercepted. Never enqueues.
    pub async fn should_open_link(&self, url: &str) -> LinkVerdict {
        let settings = self.settings().await;
        LinkVerdict {
            should_intercept: settings.enabled
                && settings.direct_open
                && !is_excluded(url, &settings.excluded_domains),
        }
    }

    async fn link_click(&self, url: String) -> DirectClickVerdict {
        let settings = self.settings().await;
        if !settings.enabled || !settings.direct_open {
            return DirectClickVerdict::default();
        }
        if is_excluded(&url, &settings.excluded_domains) {
            if settings.debug_mode {
                debug!("Excluded link: {}", url);
            }
            return DirectClickVerdict::default();
        }

        match self.enqueue(vec![url], OpenSource::LinkClick).await {
            Ok(_) => DirectClickVerdict {
                should_open: true,
                should_intercept: true,
            },
            Err(e) => {
                warn!("Dropped link click: {}", e);
                DirectClickVerdict::default()
            }
        }
    }

    async fn check_selection(&self, text: &str) -> SelectionVerdict {
        let settings = self.settings().await;
        let valid = settings.enabled && is_candidate_url(text, settings.url_sensitivity);

        let mut opened = false;
        if valid && settings.direct_open {
            let mut candidates = extract_candidates(text, settings.url_sensitivity);
            if !settings.multi_url_support {
                candidates.truncate(1);
            }
            let urls = retain_allowed(candidates, &settings.excluded_domains);
            if settings.debug_mode {
                debug!("Selection yielded {} openable URLs", urls.len());
            }
            if !urls.is_empty() {
                match self.enqueue(urls, OpenSource::Selection).await {
                    Ok(_) => opened = true,
                    Err(e) => warn!("Dropped selection: {}", e),
                }
            }
        }

        let verdict = SelectionVerdict {
            show_context_menu: valid && !settings.direct_open,
            direct_open: opened,
        };
        if let Err(e) = update_visibility(
            self.menus.as_ref(),
            verdict.show_context_menu,
            settings.multi_url_support,
        )
        .await
        {
            debug!("Failed to update menu visibility: {}", e);
        }
        verdict
    }

    async fn open_multiple(&self, text: &str) -> Outcome {
        let settings = self.settings().await;
        if !settings.enabled || !settings.multi_url_support {
            return Outcome::failure();
        }

        let candidates = extract_candidates(text, settings.url_sensitivity);
        let found = candidates.len();
        let urls = retain_allowed(candidates, &settings.excluded_domains);
        if settings.debug_mode {
            debug!("Multi-URL open: {} candidates, {} allowed", found, urls.len());
        }
        if urls.is_empty() {
            return Outcome::failure();
        }

        match self.enqueue(urls, OpenSource::MultiUrl).await {
            Ok(_) => Outcome::success(),
            Err(e) => {
                warn!("Dropped multi-URL open: {}", e);
                Outcome::failure()
            }
        }
    }

    /// One of our context-menu entries was clicked.
    pub async fn on_context_menu_clicked(&self, click: MenuClick) -> Result<(), ArbiterError> {
        let settings = self.settings().await;
        if !settings.enabled {
            return Ok(());
        }

        match click.menu_id.as_str() {
            OPEN_LINK_MENU_ID => {
                let url = click.link_url.or_else(|| {
                    click
                        .selection_text
                        .as_deref()
                        .and_then(|text| {
                            extract_candidates(text, settings.url_sensitivity)
                                .into_iter()
                                .next()
                        })
                });
                let Some(url) = url else {
                    return Ok(());
                };
                if is_excluded(&url, &settings.excluded_domains) {
                    if settings.debug_mode {
                        debug!("Excluded menu open: {}", url);
                    }
                    return Ok(());
                }
                self.enqueue(vec![url], OpenSource::ContextMenu).await?;
            }
            OPEN_MULTIPLE_MENU_ID => {
                // Routed through the page so its debounce applies.
                if let (Some(tab), Some(text)) = (click.tab, click.selection_text) {
                    let message = PageMessage::OpenMultipleFromSelection { text };
                    if let Err(e) = self.pages.send(tab, message).await {
                        debug!("Could not reach {}: {}", tab, e);
                    }
                }
            }
            other => debug!("Ignoring click on unknown menu entry {}", other),
        }
        Ok(())
    }

    /// A tab became active: make sure it has a detector.
    pub async fn on_tab_activated(&self, tab: TabId) {
        if let Some(ref injector) = self.injector {
            if let Err(e) = injector.inject_detector(tab).await {
                debug!("Detector injection into {} failed: {}", tab, e);
            }
        }
    }

    async fn enqueue(&self, urls: Vec<String>, source: OpenSource) -> Result<usize, ArbiterError> {
        let opens = urls
            .into_iter()
            .map(|url| PendingOpen::new(url, source))
            .collect();
        let count = self.queue().enqueue_all(opens).await?;
        self.processor.kick();
        Ok(count)
    }
}

#[cfg(test)]
#[path = "arbiter_tests.rs"]
mod tests;
