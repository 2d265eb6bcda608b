//! # Tabsling Protocols
//!
//! Message and collaborator definitions shared by the page-side detector
//! and the privileged arbiter. Contains only interface definitions - no
//! implementations.
//!
//! ## Messages
//!
//! - [`Request`] - detector or settings UI to arbiter, tagged by `action`
//! - [`Response`] - arbiter replies
//! - [`PageMessage`] - arbiter to detector broadcasts and targeted requests
//! - [`Intent`] - the classified "user wants to open this" subset of requests
//!
//! ## Collaborators
//!
//! - [`TabCreator`] - creates tabs
//! - [`ContextMenuRegistry`] - registers and toggles menu entries
//! - [`PageMessenger`] - reaches detectors in open pages
//! - [`ScriptInjector`] - loads the detector into a page
//! - [`ArbiterClient`] - the detector's request channel

pub mod error;
pub mod host;
pub mod message;

pub use error::{HostError, MessagingError};
pub use host::{
    ArbiterClient, ContextMenuRegistry, CreateTab, MenuClick, MenuContext, MenuEntry,
    PageMessenger, ScriptInjector, TabCreator, TabId,
};
pub use message::{
    DirectClickVerdict, ExtensionState, Intent, LinkVerdict, Outcome, PageMessage, Request,
    Response, SelectionVerdict,
};
