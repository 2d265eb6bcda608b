//! Error types for the Tabsling protocol layer.

mod host;
mod messaging;

pub use host::*;
pub use messaging::*;
