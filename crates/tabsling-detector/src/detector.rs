//! The interaction detector.
//!
//! One detector lives in each page. It turns raw pointer and context-menu
//! events into intents, asks the arbiter what to do with them and decides
//! whether the native context menu may open.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tabsling_config::DetectorSettings;
use tabsling_protocols::{
    ArbiterClient, DirectClickVerdict, Outcome, PageMessage, Request, Response, SelectionVerdict,
};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::click::{ClickMeasure, ClickState};
use crate::dom::NodeId;
use crate::error::DetectorError;
use crate::events::{DetectorPhase, EventDisposition, MouseButton, PageEvent, PointerEvent};
use crate::link::resolve_link;
use crate::page::{PageContext, is_related};

/// Delay between a pointer release and reading the selection, so the
/// browser has finished updating it.
pub const SELECTION_SETTLE_MS: u64 = 10;

/// Page-side event classifier.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct InteractionDetector {
    inner: Arc<Inner>,
}

struct Inner {
    client: Arc<dyn ArbiterClient>,
    page: Arc<dyn PageContext>,
    settings: RwLock<DetectorSettings>,
    enabled: AtomicBool,
    attached: AtomicBool,
    state: Mutex<ClickState>,
    phase: Mutex<DetectorPhase>,
    pending_check: Mutex<Option<JoinHandle<()>>>,
}

impl InteractionDetector {
    /// Create a detector with default settings. Call [`init`](Self::init)
    /// to fetch the real ones.
    pub fn new(client: Arc<dyn ArbiterClient>, page: Arc<dyn PageContext>) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                page,
                settings: RwLock::new(DetectorSettings::default()),
                enabled: AtomicBool::new(true),
                attached: AtomicBool::new(true),
                state: Mutex::new(ClickState::default()),
                phase: Mutex::new(DetectorPhase::Idle),
                pending_check: Mutex::new(None),
            }),
        }
    }

    /// Seed the enabled flag and settings snapshot from the arbiter.
    pub async fn init(&self) -> Result<(), DetectorError> {
        let state = self
            .inner
            .request(Request::GetExtensionState)
            .await?
            .into_state()
            .ok_or(DetectorError::UnexpectedResponse("getExtensionState"))?;
        self.inner.enabled.store(state.enabled, Ordering::SeqCst);

        let settings = self
            .inner
            .request(Request::GetAdvancedSettings)
            .await?
            .into_settings()
            .ok_or(DetectorError::UnexpectedResponse("getAdvancedSettings"))?;
        *self.inner.settings.write() = settings;

        debug!("Detector initialized (enabled: {})", state.enabled);
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.load(Ordering::SeqCst)
    }

    /// `false` once the extension context was invalidated.
    pub fn is_attached(&self) -> bool {
        self.inner.is_attached()
    }

    pub fn settings(&self) -> DetectorSettings {
        self.inner.settings.read().clone()
    }

    pub fn phase(&self) -> DetectorPhase {
        *self.inner.phase.lock()
    }

    pub fn click_state(&self) -> ClickState {
        self.inner.state.lock().clone()
    }

    /// Feed one page event. Events of one page must be fed in order.
    pub async fn handle_event(&self, event: PageEvent) -> EventDisposition {
        if !self.inner.is_attached() || !self.is_enabled() {
            return EventDisposition::Default;
        }

        match event {
            PageEvent::PointerDown(down) => {
                self.inner.on_pointer_down(&down);
                EventDisposition::Default
            }
            PageEvent::PointerUp(up) | PageEvent::AuxClick(up) => {
                Inner::on_release(&self.inner, up).await
            }
            PageEvent::ContextMenu { target, trusted } => {
                self.inner.on_context_menu(target, trusted).await
            }
        }
    }

    /// Handle a message from the arbiter.
    pub async fn handle_message(&self, message: PageMessage) -> Outcome {
        if !self.inner.is_attached() {
            return Outcome::failure();
        }

        match message {
            PageMessage::ExtensionStateChanged { enabled } => {
                self.inner.enabled.store(enabled, Ordering::SeqCst);
                debug!("Extension state changed (enabled: {})", enabled);
                Outcome::success()
            }
            PageMessage::AdvancedSettingsUpdated { settings } => {
                *self.inner.settings.write() = settings;
                Outcome::success()
            }
            PageMessage::OpenMultipleFromSelection { text } => self.inner.open_multiple(text).await,
        }
    }

    /// Wait for a scheduled selection check to finish.
    pub async fn settle(&self) {
        let pending = self.inner.pending_check.lock().take();
        if let Some(handle) = pending {
            let _ = handle.await;
        }
    }
}

impl Inner {
    fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn settings(&self) -> DetectorSettings {
        self.settings.read().clone()
    }

    fn set_phase(&self, phase: DetectorPhase) {
        *self.phase.lock() = phase;
    }

    fn on_pointer_down(&self, down: &PointerEvent) {
        let mut state = self.state.lock();
        if down.button == MouseButton::Secondary {
            state.arm(down);
            self.set_phase(DetectorPhase::ArmedByPointerDown);
        } else {
            state.reset_gesture();
            self.set_phase(DetectorPhase::Idle);
        }
    }

    async fn on_release(self: &Arc<Self>, up: PointerEvent) -> EventDisposition {
        if up.button != MouseButton::Secondary {
            return EventDisposition::Default;
        }

        let (measure, link_intercepted) = {
            let mut state = self.state.lock();
            let Some(down_target) = state.down_target else {
                return EventDisposition::Default;
            };
            if state.release_seen {
                return EventDisposition::Default;
            }
            state.release_seen = true;
            let related = is_related(self.page.as_ref(), up.target, down_target);
            (
                ClickMeasure::between(&state, &up, related),
                state.link_intercepted,
            )
        };

        let settings = self.settings();
        let intentional = measure.is_intentional(&settings);
        if settings.debug_mode {
            debug!(
                "Secondary release: {:.1}px, {}ms, same target {} -> intentional {}",
                measure.distance_px, measure.elapsed_ms, measure.same_target, intentional
            );
        }

        if intentional && settings.direct_open && !link_intercepted {
            if let Some(url) = resolve_link(self.page.as_ref(), up.target) {
                self.direct_link_click(url, &settings).await;
            }
        }

        self.schedule_selection_check();
        EventDisposition::Default
    }

    async fn on_context_menu(&self, target: NodeId, trusted: bool) -> EventDisposition {
        let now = self.page.now_ms();

        if !trusted {
            return if self.state.lock().take_guard(now) {
                debug!("Suppressed synthetic context menu");
                EventDisposition::Suppress
            } else {
                EventDisposition::Default
            };
        }

        let (handled, release_seen) = {
            let mut state = self.state.lock();
            (state.take_handled(), state.release_seen)
        };
        if handled {
            self.set_phase(DetectorPhase::ContextMenuSuppressed);
            return EventDisposition::Suppress;
        }

        // Menu raised without a classified release (keyboard, touch, or a
        // platform that opens the menu on press).
        let settings = self.settings();
        if !release_seen && settings.direct_open {
            if let Some(url) = resolve_link(self.page.as_ref(), target) {
                if self.direct_link_click(url, &settings).await {
                    {
                        let mut state = self.state.lock();
                        state.handled = false;
                        state.link_intercepted = true;
                    }
                    self.set_phase(DetectorPhase::ContextMenuSuppressed);
                    return EventDisposition::Suppress;
                }
            }
        }

        self.set_phase(DetectorPhase::ContextMenuAllowed);
        EventDisposition::Default
    }

    /// Report an intentional link click. Returns whether it was intercepted.
    async fn direct_link_click(&self, url: String, settings: &DetectorSettings) -> bool {
        if self
            .state
            .lock()
            .is_debounced(self.page.now_ms(), settings.debounce_ms)
        {
            if settings.debug_mode {
                debug!("Dropped link click inside debounce window: {}", url);
            }
            return false;
        }

        match self.direct_click(url.clone()).await {
            Ok(verdict) if verdict.should_intercept => {
                let now = self.page.now_ms();
                let mut state = self.state.lock();
                state.handled = true;
                state.arm_guard(now);
                if verdict.should_open {
                    state.record_open(now);
                }
                true
            }
            Ok(_) => {
                if settings.debug_mode {
                    debug!("Arbiter declined link: {}", url);
                }
                false
            }
            Err(e) => {
                self.log_failure("directLinkClick", &e);
                false
            }
        }
    }

    fn schedule_selection_check(self: &Arc<Self>) {
        let inner = Arc::clone(self);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(SELECTION_SETTLE_MS)).await;
            inner.check_selection().await;
        });
        *self.pending_check.lock() = Some(handle);
    }

    async fn check_selection(&self) {
        if !self.is_attached() || !self.is_enabled() {
            return;
        }

        let text = self.page.selection_text().trim().to_string();
        if text.is_empty() {
            return;
        }

        let settings = self.settings();
        {
            let mut state = self.state.lock();
            if state.checked_selection.as_deref() == Some(text.as_str()) {
                return;
            }
            if state.consumed_selection.as_deref() == Some(text.as_str()) {
                if settings.debug_mode {
                    debug!("Selection already opened, ignoring");
                }
                return;
            }
            if settings.direct_open && state.is_debounced(self.page.now_ms(), settings.debounce_ms) {
                if settings.debug_mode {
                    debug!("Dropped selection check inside debounce window");
                }
                return;
            }
            state.consumed_selection = None;
            state.checked_selection = Some(text.clone());
        }

        match self.check_selection_request(text.clone()).await {
            Ok(verdict) => {
                if verdict.direct_open {
                    let now = self.page.now_ms();
                    let mut state = self.state.lock();
                    state.record_open(now);
                    state.consumed_selection = Some(text);
                }
                if settings.debug_mode {
                    debug!(
                        "Selection verdict: show menu {}, opened {}",
                        verdict.show_context_menu, verdict.direct_open
                    );
                }
            }
            Err(e) => self.log_failure("checkSelection", &e),
        }
    }

    async fn open_multiple(&self, text: String) -> Outcome {
        if !self.is_enabled() {
            return Outcome::failure();
        }

        let settings = self.settings();
        if self
            .state
            .lock()
            .is_debounced(self.page.now_ms(), settings.debounce_ms)
        {
            if settings.debug_mode {
                debug!("Dropped multi-URL open inside debounce window");
            }
            return Outcome::failure();
        }

        let result = self
            .request(Request::OpenMultipleUrls { text })
            .await
            .and_then(|r| expect(r.into_outcome(), "openMultipleUrls"));
        match result {
            Ok(outcome) => {
                if outcome.success {
                    let now = self.page.now_ms();
                    self.state.lock().record_open(now);
                }
                outcome
            }
            Err(e) => {
                self.log_failure("openMultipleUrls", &e);
                Outcome::failure()
            }
        }
    }

    async fn direct_click(&self, url: String) -> Result<DirectClickVerdict, DetectorError> {
        let response = self.request(Request::DirectLinkClick { url }).await?;
        expect(response.into_direct_click(), "directLinkClick")
    }

    async fn check_selection_request(&self, text: String) -> Result<SelectionVerdict, DetectorError> {
        let response = self.request(Request::CheckSelection { text }).await?;
        expect(response.into_selection(), "checkSelection")
    }

    async fn request(&self, request: Request) -> Result<Response, DetectorError> {
        if !self.is_attached() {
            return Err(DetectorError::Detached);
        }
        self.client.request(request).await.map_err(|e| {
            if e.is_context_invalidated() {
                self.teardown();
            }
            DetectorError::from(e)
        })
    }

    fn teardown(&self) {
        if self.attached.swap(false, Ordering::SeqCst) {
            info!("Extension context invalidated, detaching from page");
            self.page.detach_listeners();
        }
    }

    fn log_failure(&self, action: &str, error: &DetectorError) {
        if !error.is_context_invalidated() {
            debug!("{} failed: {}", action, error);
        }
    }
}

fn expect<T>(value: Option<T>, action: &'static str) -> Result<T, DetectorError> {
    value.ok_or(DetectorError::UnexpectedResponse(action))
}

#[cfg(test)]
#[path = "detector_tests.rs"]
mod tests;
