//! Link resolution from an event target.

use url::Url;

use crate::dom::NodeId;
use crate::page::{PageContext, ancestors};

/// Attributes a button-like element may carry its destination in.
const BUTTON_URL_ATTRS: &[&str] = &["href", "data-href", "data-url", "data-link"];

/// Schemes that belong to the browser itself.
const INTERNAL_SCHEMES: &[&str] = &[
    "about",
    "chrome",
    "chrome-extension",
    "chrome-search",
    "devtools",
    "edge",
    "moz-extension",
    "resource",
    "safari-extension",
    "view-source",
];

/// Find the URL an event on `target` points at.
///
/// The nearest enclosing anchor with an `href` wins. Without one, the
/// nearest button-like element exposing a URL attribute is used. The
/// result is absolute and openable, or `None`.
pub fn resolve_link(page: &dyn PageContext, target: NodeId) -> Option<String> {
    let page_url = page.page_url();

    let anchor_href = ancestors(page, target).find_map(|node| {
        let element = page.element(node)?;
        if element.is_anchor() {
            element.attr("href").map(str::to_string)
        } else {
            None
        }
    });
    if let Some(href) = anchor_href {
        return openable_url(&href, &page_url);
    }

    let button_href = ancestors(page, target).find_map(|node| {
        let element = page.element(node)?;
        if !element.is_button_like() {
            return None;
        }
        BUTTON_URL_ATTRS
            .iter()
            .find_map(|attr| element.attr(attr).filter(|v| !v.trim().is_empty()))
            .map(str::to_string)
    });
    button_href.and_then(|href| openable_url(&href, &page_url))
}

/// Resolve `href` against `page_url`, rejecting things that are not real
/// destinations.
pub fn openable_url(href: &str, page_url: &str) -> Option<String> {
    let href = href.trim();
    let lower = href.to_ascii_lowercase();
    if href.is_empty() || href == "#" || lower == "about:blank" || lower.starts_with("javascript:")
    {
        return None;
    }

    let base = Url::parse(page_url).ok();
    let resolved = match base {
        Some(ref base) => base.join(href).ok()?,
        None => Url::parse(href).ok()?,
    };

    if INTERNAL_SCHEMES.contains(&resolved.scheme()) {
        return None;
    }
    if base.as_ref().is_some_and(|base| is_bare_fragment_of(&resolved, base)) {
        return None;
    }

    Some(resolved.to_string())
}

/// `resolved` is the page itself plus an empty `#`.
fn is_bare_fragment_of(resolved: &Url, page: &Url) -> bool {
    if resolved.fragment() != Some("") {
        return false;
    }
    let mut resolved = resolved.clone();
    let mut page = page.clone();
    resolved.set_fragment(None);
    page.set_fragment(None);
    resolved == page
}
