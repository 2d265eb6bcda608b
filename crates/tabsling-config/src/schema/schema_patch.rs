//! Partial settings updates.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{normalize_domains, Settings, UrlSensitivity};

/// Partial update sent by the settings UI. Absent keys are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_open: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activate_new_tabs: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_url_support: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluded_domains: Option<BTreeSet<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_distance_px: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_time_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_mode: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_sensitivity: Option<UrlSensitivity>,
}

impl SettingsPatch {
    /// Whether the patch carries no keys.
    pub fn is_empty(&self) -> bool {
        *self == SettingsPatch::default()
    }

    /// Set `enabled`.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }
}

/// What a patch actually changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsDelta {
    /// `Some(new)` when `enabled` flipped.
    pub enabled_transition: Option<bool>,

    /// `multiUrlSupport` flipped, so menu entries must be re-registered.
    pub multi_url_changed: bool,

    /// camelCase names of every key whose value changed.
    pub changed_keys: Vec<&'static str>,
}

impl SettingsDelta {
    pub fn is_empty(&self) -> bool {
        self.changed_keys.is_empty()
    }
}

macro_rules! merge_field {
    ($settings:ident, $patch:ident, $delta:ident, $field:ident, $key:literal) => {
        if let Some(value) = $patch.$field {
            if $settings.$field != value {
                $settings.$field = value;
                $delta.changed_keys.push($key);
            }
        }
    };
}

impl Settings {
    /// Merge a partial update, returning what changed.
    pub fn apply(&mut self, patch: &SettingsPatch) -> SettingsDelta {
        let mut delta = SettingsDelta::default();
        let was_enabled = self.enabled;
        let had_multi = self.multi_url_support;

        merge_field!(self, patch, delta, enabled, "enabled");
        merge_field!(self, patch, delta, direct_open, "directOpen");
        merge_field!(self, patch, delta, activate_new_tabs, "activateNewTabs");
        merge_field!(self, patch, delta, multi_url_support, "multiUrlSupport");
        merge_field!(self, patch, delta, debounce_ms, "debounceMs");
        merge_field!(self, patch, delta, click_distance_px, "clickDistancePx");
        merge_field!(self, patch, delta, click_time_ms, "clickTimeMs");
        merge_field!(self, patch, delta, debug_mode, "debugMode");
        merge_field!(self, patch, delta, url_sensitivity, "urlSensitivity");

        if let Some(ref domains) = patch.excluded_domains {
            let domains = normalize_domains(domains);
            if self.excluded_domains != domains {
                self.excluded_domains = domains;
                delta.changed_keys.push("excludedDomains");
            }
        }

        if self.enabled != was_enabled {
            delta.enabled_transition = Some(self.enabled);
        }
        delta.multi_url_changed = self.multi_url_support != had_multi;
        delta
    }
}
