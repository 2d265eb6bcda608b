//! # Tabsling Detector
//!
//! The page-side half of the intent pipeline. An [`InteractionDetector`]
//! watches secondary-button gestures in one page, tells an intentional
//! right-click from a drag or long press, resolves the link under the
//! pointer and reports intents to the arbiter through an
//! [`ArbiterClient`](tabsling_protocols::ArbiterClient).
//!
//! ## Gesture
//!
//! ```text
//! Idle -> ArmedByPointerDown -> ContextMenuSuppressed | ContextMenuAllowed
//! ```
//!
//! A release counts as intentional when it lands within
//! `clickDistancePx` and `clickTimeMs` of the press, on the same element or
//! one containing or contained by it.

pub mod click;
pub mod detector;
pub mod dom;
pub mod error;
pub mod events;
pub mod link;
pub mod page;

pub use click::ClickState;
pub use detector::{InteractionDetector, SELECTION_SETTLE_MS};
pub use dom::{DomTree, Element, NodeId};
pub use error::DetectorError;
pub use events::{DetectorPhase, EventDisposition, MouseButton, PageEvent, PointerEvent};
pub use link::{openable_url, resolve_link};
pub use page::{PageContext, StaticPage};
