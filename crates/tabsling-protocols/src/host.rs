//! Host platform collaborators.
//!
//! The arbiter and detector never talk to the browser directly. Everything
//! they need from the host goes through these traits.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{HostError, MessagingError};
use crate::message::{Outcome, PageMessage, Request, Response};

/// Browser tab identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TabId(pub u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab#{}", self.0)
    }
}

/// Tab creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTab {
    pub url: String,
    /// Focus the new tab instead of opening it in the background.
    pub active: bool,
}

/// Creates browser tabs.
#[async_trait]
pub trait TabCreator: Send + Sync {
    /// Create a tab and wait until the host has accepted it.
    async fn create_tab(&self, request: CreateTab) -> Result<TabId, HostError>;
}

/// Where a context-menu entry may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuContext {
    Link,
    Selection,
}

/// A context-menu entry definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub id: String,
    pub title: String,
    pub contexts: Vec<MenuContext>,
    pub visible: bool,
}

/// A click on one of our context-menu entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuClick {
    pub menu_id: String,
    /// Page the menu was opened in.
    pub tab: Option<TabId>,
    /// Set when the menu was opened on a link.
    pub link_url: Option<String>,
    /// Set when the menu was opened on a text selection.
    pub selection_text: Option<String>,
}

/// Registers context-menu entries and updates their visibility.
#[async_trait]
pub trait ContextMenuRegistry: Send + Sync {
    async fn remove_all(&self) -> Result<(), HostError>;

    async fn create(&self, entry: MenuEntry) -> Result<(), HostError>;

    async fn set_visible(&self, id: &str, visible: bool) -> Result<(), HostError>;
}

/// Reaches page detectors from the arbiter.
#[async_trait]
pub trait PageMessenger: Send + Sync {
    /// Pages that may have a detector loaded.
    async fn pages(&self) -> Vec<TabId>;

    /// Deliver a message to one page.
    async fn send(&self, tab: TabId, message: PageMessage) -> Result<Outcome, MessagingError>;
}

/// Loads the detector into a page.
#[async_trait]
pub trait ScriptInjector: Send + Sync {
    async fn inject_detector(&self, tab: TabId) -> Result<(), HostError>;
}

/// The detector's request channel to the arbiter.
#[async_trait]
pub trait ArbiterClient: Send + Sync {
    async fn request(&self, request: Request) -> Result<Response, MessagingError>;
}
