//! Minimal DOM model: element tags, attributes and the parent chain.
//!
//! The detector only ever walks upward from an event target, so nodes keep
//! a parent link and nothing else.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Index of a node inside a [`DomTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

/// An element's tag and attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Tag name (lowercase).
    pub tag: String,

    /// Attribute values by name.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// `<a>` or `<area>`.
    pub fn is_anchor(&self) -> bool {
        matches!(self.tag.as_str(), "a" | "area")
    }

    /// `<button>`, `role="button"` or anything with an inline `onclick`.
    pub fn is_button_like(&self) -> bool {
        self.tag == "button"
            || self
                .attr("role")
                .is_some_and(|role| role.eq_ignore_ascii_case("button"))
            || self.has_attr("onclick")
    }
}

/// One node of a [`DomTree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomNode {
    #[serde(flatten)]
    pub element: Element,

    #[serde(default)]
    pub parent: Option<NodeId>,
}

/// Arena of DOM nodes addressed by [`NodeId`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomTree {
    nodes: Vec<DomNode>,
}

impl DomTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node under `parent` (or as a root).
    pub fn add(&mut self, parent: Option<NodeId>, element: Element) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(DomNode { element, parent });
        id
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0).map(|n| &n.element)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
