//! Page events fed to the detector.

use serde::{Deserialize, Serialize};

use crate::dom::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Primary,
    Auxiliary,
    Secondary,
}

/// A pointer press or release.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerEvent {
    pub button: MouseButton,
    pub x: f64,
    pub y: f64,
    pub target: NodeId,
    /// Event timestamp in milliseconds.
    pub time_ms: u64,
}

/// Raw events the detector listens for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PageEvent {
    PointerDown(PointerEvent),
    PointerUp(PointerEvent),
    AuxClick(PointerEvent),
    ContextMenu {
        target: NodeId,
        /// `false` for script-dispatched events.
        #[serde(default = "default_trusted")]
        trusted: bool,
    },
}

fn default_trusted() -> bool {
    true
}

/// What the page should do with the event after the detector saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventDisposition {
    /// Let the browser carry on.
    #[default]
    Default,
    /// Prevent the default action and stop propagation.
    Suppress,
}

/// Where the detector is in a secondary-click gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectorPhase {
    #[default]
    Idle,
    ArmedByPointerDown,
    ContextMenuSuppressed,
    ContextMenuAllowed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_format() {
        let event: PageEvent = serde_json::from_str(
            r#"{"type":"pointerDown","button":"secondary","x":10,"y":20.5,"target":3,"timeMs":40}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            PageEvent::PointerDown(PointerEvent {
                button: MouseButton::Secondary,
                x: 10.0,
                y: 20.5,
                target: NodeId(3),
                time_ms: 40,
            })
        );
    }

    #[test]
    fn test_context_menu_trusted_by_default() {
        let event: PageEvent = serde_json::from_str(r#"{"type":"contextMenu","target":1}"#).unwrap();
        assert_eq!(
            event,
            PageEvent::ContextMenu {
                target: NodeId(1),
                trusted: true
            }
        );
    }
}
