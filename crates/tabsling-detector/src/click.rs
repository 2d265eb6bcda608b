//! Per-page click bookkeeping and the intentional-click test.

use tabsling_config::DetectorSettings;

use crate::dom::NodeId;
use crate::events::PointerEvent;

/// How long the synthetic context-menu guard stays armed.
pub const SYNTHETIC_GUARD_MS: u64 = 100;

/// Everything the detector remembers between events of one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClickState {
    pub down_target: Option<NodeId>,
    pub down_time_ms: u64,
    pub down_x: f64,
    pub down_y: f64,

    /// Set when a direct open intercepted the gesture; consumed by the next
    /// native context-menu event.
    pub handled: bool,

    /// Time of the last open action, for debouncing.
    pub last_open_ms: Option<u64>,

    /// Pointer-up or auxclick already processed for this gesture.
    pub release_seen: bool,

    /// The context menu of this gesture already intercepted its link.
    pub link_intercepted: bool,

    /// Selection text already sent during this gesture.
    pub checked_selection: Option<String>,

    /// Selection text the arbiter already opened.
    pub consumed_selection: Option<String>,

    /// Deadline of the one-shot synthetic context-menu guard.
    pub guard_until_ms: Option<u64>,
}

impl ClickState {
    /// Start a new secondary-button gesture.
    pub fn arm(&mut self, down: &PointerEvent) {
        self.down_target = Some(down.target);
        self.down_time_ms = down.time_ms;
        self.down_x = down.x;
        self.down_y = down.y;
        self.handled = false;
        self.release_seen = false;
        self.link_intercepted = false;
        self.checked_selection = None;
    }

    /// Forget the gesture (non-secondary pointer-down).
    pub fn reset_gesture(&mut self) {
        self.down_target = None;
        self.handled = false;
        self.release_seen = false;
        self.link_intercepted = false;
        self.checked_selection = None;
    }

    /// Whether an open at `now_ms` falls inside the debounce window.
    pub fn is_debounced(&self, now_ms: u64, debounce_ms: u64) -> bool {
        self.last_open_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < debounce_ms)
    }

    pub fn record_open(&mut self, now_ms: u64) {
        self.last_open_ms = Some(now_ms);
    }

    pub fn arm_guard(&mut self, now_ms: u64) {
        self.guard_until_ms = Some(now_ms + SYNTHETIC_GUARD_MS);
    }

    /// Consume the guard if it is still armed at `now_ms`.
    pub fn take_guard(&mut self, now_ms: u64) -> bool {
        match self.guard_until_ms.take() {
            Some(until) => now_ms <= until,
            None => false,
        }
    }

    /// Consume `handled`.
    pub fn take_handled(&mut self) -> bool {
        std::mem::take(&mut self.handled)
    }
}

/// Measurements of a press/release pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickMeasure {
    pub distance_px: f64,
    pub elapsed_ms: u64,
    /// Release target is the press target, an ancestor or a descendant.
    pub same_target: bool,
}

impl ClickMeasure {
    pub fn between(state: &ClickState, up: &PointerEvent, same_target: bool) -> Self {
        Self {
            distance_px: (up.x - state.down_x).hypot(up.y - state.down_y),
            elapsed_ms: up.time_ms.saturating_sub(state.down_time_ms),
            same_target,
        }
    }

    /// Short, still and on the same element.
    pub fn is_intentional(&self, settings: &DetectorSettings) -> bool {
        self.distance_px < f64::from(settings.click_distance_px)
            && self.elapsed_ms < settings.click_time_ms
            && self.same_target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MouseButton;

    fn pointer(x: f64, y: f64, time_ms: u64) -> PointerEvent {
        PointerEvent {
            button: MouseButton::Secondary,
            x,
            y,
            target: NodeId(1),
            time_ms,
        }
    }

    fn measure(up: PointerEvent) -> ClickMeasure {
        let mut state = ClickState::default();
        state.arm(&pointer(100.0, 100.0, 0));
        ClickMeasure::between(&state, &up, true)
    }

    #[test]
    fn test_short_still_click_is_intentional() {
        let m = measure(pointer(102.0, 101.0, 150));
        assert!(m.distance_px < 3.0);
        assert_eq!(m.elapsed_ms, 150);
        assert!(m.is_intentional(&DetectorSettings::default()));
    }

    #[test]
    fn test_drag_is_not_intentional() {
        let m = measure(pointer(130.0, 100.0, 150));
        assert!(!m.is_intentional(&DetectorSettings::default()));
    }

    #[test]
    fn test_long_press_is_not_intentional() {
        let m = measure(pointer(100.0, 100.0, 300));
        assert!(!m.is_intentional(&DetectorSettings::default()));
    }

    #[test]
    fn test_unrelated_target_is_not_intentional() {
        let mut state = ClickState::default();
        state.arm(&pointer(100.0, 100.0, 0));
        let m = ClickMeasure::between(&state, &pointer(100.0, 100.0, 10), false);
        assert!(!m.is_intentional(&DetectorSettings::default()));
    }

    #[test]
    fn test_thresholds_follow_settings() {
        let settings = DetectorSettings {
            click_distance_px: 50,
            ..Default::default()
        };
        assert!(measure(pointer(130.0, 100.0, 150)).is_intentional(&settings));
    }

    #[test]
    fn test_arm_clears_stale_handled() {
        let mut state = ClickState {
            handled: true,
            checked_selection: Some("a.com".to_string()),
            consumed_selection: Some("b.com".to_string()),
            ..Default::default()
        };
        state.arm(&pointer(1.0, 1.0, 5));
        assert!(!state.handled);
        assert!(state.checked_selection.is_none());
        assert_eq!(state.consumed_selection.as_deref(), Some("b.com"));
    }

    #[test]
    fn test_debounce_window() {
        let mut state = ClickState::default();
        assert!(!state.is_debounced(0, 500));
        state.record_open(1000);
        assert!(state.is_debounced(1499, 500));
        assert!(!state.is_debounced(1500, 500));
    }

    #[test]
    fn test_guard_is_one_shot() {
        let mut state = ClickState::default();
        state.arm_guard(1000);
        assert!(state.take_guard(1050));
        assert!(!state.take_guard(1060));

        state.arm_guard(1000);
        assert!(!state.take_guard(1000 + SYNTHETIC_GUARD_MS + 1));
    }

    #[test]
    fn test_take_handled() {
        let mut state = ClickState {
            handled: true,
            ..Default::default()
        };
        assert!(state.take_handled());
        assert!(!state.take_handled());
    }
}
