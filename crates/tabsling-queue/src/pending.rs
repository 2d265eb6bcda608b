//! Queued open definition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What produced a queued URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenSource {
    /// Intentional right-click on a link.
    LinkClick,
    /// Selection opened directly on check.
    Selection,
    /// "Open multiple" request.
    MultiUrl,
    /// Our context-menu entry.
    ContextMenu,
}

/// A URL waiting for tab creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingOpen {
    /// Unique entry ID.
    pub id: Uuid,
    /// URL to open, as given by the caller.
    pub url: String,
    /// Origin of the request.
    pub source: OpenSource,
    /// When the entry was queued.
    pub enqueued_at: DateTime<Utc>,
}

impl PendingOpen {
    /// Create a new entry.
    pub fn new(url: impl Into<String>, source: OpenSource) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            source,
            enqueued_at: Utc::now(),
        }
    }

    /// Time spent waiting so far.
    pub fn waited(&self) -> chrono::Duration {
        Utc::now() - self.enqueued_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_open_new() {
        let open = PendingOpen::new("https://example.com", OpenSource::LinkClick);
        assert_eq!(open.url, "https://example.com");
        assert_eq!(open.source, OpenSource::LinkClick);
        assert!(open.waited() >= chrono::Duration::zero());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = PendingOpen::new("https://a.example", OpenSource::MultiUrl);
        let b = PendingOpen::new("https://a.example", OpenSource::MultiUrl);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_source_serialization() {
        let json = serde_json::to_string(&OpenSource::ContextMenu).unwrap();
        assert_eq!(json, "\"context_menu\"");
    }
}
