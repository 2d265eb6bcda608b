//! Settings schema definitions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub use tabsling_lexer::UrlSensitivity;

mod schema_host;
mod schema_patch;

pub use schema_host::*;
pub use schema_patch::*;

/// Shared default helper used by submodules.
pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_debounce_ms() -> u64 {
    500
}

pub(crate) fn default_click_distance_px() -> u32 {
    5
}

pub(crate) fn default_click_time_ms() -> u64 {
    300
}

/// Normalize an exclusion entry or hostname.
///
/// Lower-cases, trims, drops a trailing dot and a single leading `www.`.
pub fn normalize_domain(domain: &str) -> String {
    let lower = domain.trim().to_ascii_lowercase();
    let host = lower.strip_prefix("www.").unwrap_or(&lower);
    host.trim_end_matches('.').to_string()
}

/// Durable user settings.
///
/// Every key has a default, so a partially populated store still yields a
/// complete value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Master switch.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Open resolved links and URL selections immediately instead of
    /// offering a context-menu entry.
    #[serde(default = "default_true")]
    pub direct_open: bool,

    /// Focus newly created tabs.
    #[serde(default)]
    pub activate_new_tabs: bool,

    /// Open every URL line of a selection, not just the first.
    #[serde(default = "default_true")]
    pub multi_url_support: bool,

    /// Hostnames that are never opened.
    #[serde(default)]
    pub excluded_domains: BTreeSet<String>,

    /// Minimum gap between two open actions in one page.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Maximum pointer travel for an intentional click.
    #[serde(default = "default_click_distance_px")]
    pub click_distance_px: u32,

    /// Maximum press duration for an intentional click.
    #[serde(default = "default_click_time_ms")]
    pub click_time_ms: u64,

    /// Verbose decision logging.
    #[serde(default)]
    pub debug_mode: bool,

    /// Which text shapes count as URLs.
    #[serde(default)]
    pub url_sensitivity: UrlSensitivity,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            direct_open: default_true(),
            activate_new_tabs: false,
            multi_url_support: default_true(),
            excluded_domains: BTreeSet::new(),
            debounce_ms: default_debounce_ms(),
            click_distance_px: default_click_distance_px(),
            click_time_ms: default_click_time_ms(),
            debug_mode: false,
            url_sensitivity: UrlSensitivity::default(),
        }
    }
}

impl Settings {
    /// Return a copy whose exclusion entries are normalized and non-empty.
    pub fn normalized(mut self) -> Self {
        self.excluded_domains = normalize_domains(&self.excluded_domains);
        self
    }

    /// The subset mirrored into page detectors.
    pub fn detector_settings(&self) -> DetectorSettings {
        DetectorSettings::from(self)
    }
}

pub(crate) fn normalize_domains<'a, I>(domains: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a String>,
{
    domains
        .into_iter()
        .map(|d| normalize_domain(d))
        .filter(|d| !d.is_empty())
        .collect()
}

/// Settings snapshot held by a page detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectorSettings {
    #[serde(default = "default_true")]
    pub direct_open: bool,

    #[serde(default = "default_true")]
    pub multi_url_support: bool,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_click_distance_px")]
    pub click_distance_px: u32,

    #[serde(default = "default_click_time_ms")]
    pub click_time_ms: u64,

    #[serde(default)]
    pub debug_mode: bool,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        DetectorSettings::from(&Settings::default())
    }
}

impl From<&Settings> for DetectorSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            direct_open: settings.direct_open,
            multi_url_support: settings.multi_url_support,
            debounce_ms: settings.debounce_ms,
            click_distance_px: settings.click_distance_px,
            click_time_ms: settings.click_time_ms,
            debug_mode: settings.debug_mode,
        }
    }
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
