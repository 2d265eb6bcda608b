//! Per-domain exclusion.

use std::collections::BTreeSet;

use tabsling_config::normalize_domain;
use url::Url;

/// Whether `url`'s host is on the exclusion list.
///
/// The host is compared with `www.` stripped. An entry excludes its own
/// host and every subdomain of it. URLs without a parsable host are never
/// excluded.
pub fn is_excluded(url: &str, excluded: &BTreeSet<String>) -> bool {
    if excluded.is_empty() {
        return false;
    }
    let Some(host) = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(normalize_domain))
    else {
        return false;
    };
    if host.is_empty() {
        return false;
    }

    excluded.iter().any(|entry| {
        host == *entry
            || host
                .strip_suffix(entry.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

/// Keep the URLs that are not excluded, in order.
pub fn retain_allowed(urls: Vec<String>, excluded: &BTreeSet<String>) -> Vec<String> {
    urls.into_iter().filter(|u| !is_excluded(u, excluded)).collect()
}
