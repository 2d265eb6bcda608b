//! The detector's view of the page it lives in.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::dom::{DomTree, Element, NodeId};

/// Page access needed by the detector.
///
/// Implementations wrap the host page: its DOM, live selection, URL and
/// clock. Every method is synchronous, as DOM access is.
pub trait PageContext: Send + Sync {
    /// URL of the document, used to resolve relative links.
    fn page_url(&self) -> String;

    fn element(&self, node: NodeId) -> Option<Element>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Current text selection (empty when nothing is selected).
    fn selection_text(&self) -> String;

    /// Monotonic milliseconds.
    fn now_ms(&self) -> u64;

    /// Remove every listener the detector registered.
    fn detach_listeners(&self);
}

/// Yield `node` and each of its ancestors, innermost first.
pub fn ancestors(page: &dyn PageContext, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    std::iter::successors(Some(node), move |n| page.parent(*n))
}

/// Whether `a` and `b` are the same node or one contains the other.
pub fn is_related(page: &dyn PageContext, a: NodeId, b: NodeId) -> bool {
    ancestors(page, a).any(|n| n == b) || ancestors(page, b).any(|n| n == a)
}

/// In-memory page backed by a [`DomTree`].
///
/// The clock is tokio's, so tests running on a paused runtime control it
/// with `tokio::time::advance`.
pub struct StaticPage {
    url: String,
    dom: DomTree,
    selection: Mutex<String>,
    origin: Instant,
    detached: AtomicBool,
}

impl StaticPage {
    pub fn new(url: impl Into<String>, dom: DomTree) -> Self {
        Self {
            url: url.into(),
            dom,
            selection: Mutex::new(String::new()),
            origin: Instant::now(),
            detached: AtomicBool::new(false),
        }
    }

    pub fn dom(&self) -> &DomTree {
        &self.dom
    }

    pub fn set_selection(&self, text: impl Into<String>) {
        *self.selection.lock() = text.into();
    }

    pub fn clear_selection(&self) {
        self.selection.lock().clear();
    }

    /// Whether the detector tore down its listeners.
    pub fn is_detached(&self) -> bool {
        self.detached.load(Ordering::SeqCst)
    }
}

impl PageContext for StaticPage {
    fn page_url(&self) -> String {
        self.url.clone()
    }

    fn element(&self, node: NodeId) -> Option<Element> {
        self.dom.element(node).cloned()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.dom.parent(node)
    }

    fn selection_text(&self) -> String {
        self.selection.lock().clone()
    }

    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn detach_listeners(&self) {
        self.detached.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested_page() -> (StaticPage, NodeId, NodeId, NodeId, NodeId) {
        let mut dom = DomTree::new();
        let body = dom.add(None, Element::new("body"));
        let link = dom.add(Some(body), Element::new("a").with_attr("href", "/a"));
        let span = dom.add(Some(link), Element::new("span"));
        let aside = dom.add(Some(body), Element::new("aside"));
        (StaticPage::new("https://example.com/", dom), body, link, span, aside)
    }

    #[test]
    fn test_ancestors_innermost_first() {
        let (page, body, link, span, _) = nested_page();
        let chain: Vec<_> = ancestors(&page, span).collect();
        assert_eq!(chain, vec![span, link, body]);
    }

    #[test]
    fn test_is_related() {
        let (page, body, link, span, aside) = nested_page();
        assert!(is_related(&page, span, span));
        assert!(is_related(&page, span, link));
        assert!(is_related(&page, body, span));
        assert!(!is_related(&page, span, aside));
    }

    #[test]
    fn test_selection_and_detach() {
        let (page, ..) = nested_page();
        assert_eq!(page.selection_text(), "");
        page.set_selection("example.com");
        assert_eq!(page.selection_text(), "example.com");
        page.clear_selection();
        assert!(page.selection_text().is_empty());

        assert!(!page.is_detached());
        page.detach_listeners();
        assert!(page.is_detached());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_follows_tokio_time() {
        let (page, ..) = nested_page();
        let before = page.now_ms();
        tokio::time::advance(std::time::Duration::from_millis(250)).await;
        assert_eq!(page.now_ms() - before, 250);
    }
}
