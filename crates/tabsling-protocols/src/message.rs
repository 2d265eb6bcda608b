//! Messages crossing the privilege boundary.
//!
//! Every message is a JSON object tagged by an `action` string. Each action
//! is one enum variant, so an unhandled action is a compile error at the
//! receiving side instead of a silent fall-through.

use serde::{Deserialize, Serialize};
use tabsling_config::{DetectorSettings, SettingsPatch};

/// Requests handled by the arbiter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// Detector start-up: is the extension on?
    GetExtensionState,

    /// A text selection was made; should it be opened or offered?
    CheckSelection { text: String },

    /// Would this link be intercepted? Never enqueues.
    ShouldOpenLink { url: String },

    /// Intentional right-click on a link under direct-open mode.
    DirectLinkClick { url: String },

    /// Open every URL line of `text`.
    OpenMultipleUrls { text: String },

    /// Detector start-up: fetch the mirrored settings subset.
    GetAdvancedSettings,

    /// Settings UI pushed a partial update.
    SettingsUpdated { settings: SettingsPatch },
}

impl Request {
    /// The wire `action` tag.
    pub fn action(&self) -> &'static str {
        match self {
            Request::GetExtensionState => "getExtensionState",
            Request::CheckSelection { .. } => "checkSelection",
            Request::ShouldOpenLink { .. } => "shouldOpenLink",
            Request::DirectLinkClick { .. } => "directLinkClick",
            Request::OpenMultipleUrls { .. } => "openMultipleUrls",
            Request::GetAdvancedSettings => "getAdvancedSettings",
            Request::SettingsUpdated { .. } => "settingsUpdated",
        }
    }

    /// The open intent carried by this request, if any.
    pub fn intent(&self) -> Option<Intent> {
        match self {
            Request::DirectLinkClick { url } => Some(Intent::LinkClick(url.clone())),
            Request::CheckSelection { text } => Some(Intent::SelectionCheck(text.clone())),
            Request::OpenMultipleUrls { text } => Some(Intent::MultiUrlOpen(text.clone())),
            Request::GetExtensionState
            | Request::ShouldOpenLink { .. }
            | Request::GetAdvancedSettings
            | Request::SettingsUpdated { .. } => None,
        }
    }
}

/// A classified "the user probably wants to open this".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    LinkClick(String),
    SelectionCheck(String),
    MultiUrlOpen(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionState {
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionVerdict {
    /// Offer the context-menu entry for this selection.
    pub show_context_menu: bool,
    /// The arbiter already queued the selection's URLs.
    pub direct_open: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectClickVerdict {
    pub should_open: bool,
    pub should_intercept: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkVerdict {
    pub should_intercept: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub success: bool,
}

impl Outcome {
    pub fn success() -> Self {
        Self { success: true }
    }

    pub fn failure() -> Self {
        Self { success: false }
    }
}

/// Arbiter replies. Serialized without a tag, matching the request shape.
///
/// Variant order matters for untagged decoding: more specific shapes first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    State(ExtensionState),
    Selection(SelectionVerdict),
    DirectClick(DirectClickVerdict),
    Link(LinkVerdict),
    Outcome(Outcome),
    Settings(DetectorSettings),
}

impl Response {
    pub fn into_state(self) -> Option<ExtensionState> {
        match self {
            Response::State(state) => Some(state),
            _ => None,
        }
    }

    pub fn into_selection(self) -> Option<SelectionVerdict> {
        match self {
            Response::Selection(verdict) => Some(verdict),
            _ => None,
        }
    }

    pub fn into_direct_click(self) -> Option<DirectClickVerdict> {
        match self {
            Response::DirectClick(verdict) => Some(verdict),
            _ => None,
        }
    }

    pub fn into_outcome(self) -> Option<Outcome> {
        match self {
            Response::Outcome(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn into_settings(self) -> Option<DetectorSettings> {
        match self {
            Response::Settings(settings) => Some(settings),
            _ => None,
        }
    }
}

/// Messages from the arbiter to a page detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PageMessage {
    /// Broadcast when `enabled` changes.
    ExtensionStateChanged { enabled: bool },

    /// Broadcast with the new mirrored settings.
    AdvancedSettingsUpdated { settings: DetectorSettings },

    /// The "open multiple" menu entry was clicked in this page.
    OpenMultipleFromSelection { text: String },
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
