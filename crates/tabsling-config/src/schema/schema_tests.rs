use super::*;

#[test]
fn test_settings_default() {
    let settings = Settings::default();
    assert!(settings.enabled);
    assert!(settings.direct_open);
    assert!(!settings.activate_new_tabs);
    assert!(settings.multi_url_support);
    assert!(settings.excluded_domains.is_empty());
    assert_eq!(settings.debounce_ms, 500);
    assert_eq!(settings.click_distance_px, 5);
    assert_eq!(settings.click_time_ms, 300);
    assert!(!settings.debug_mode);
    assert_eq!(settings.url_sensitivity, UrlSensitivity::Standard);
}

#[test]
fn test_settings_missing_keys_default() {
    let settings: Settings =
        serde_json::from_str(r#"{"enabled": false, "urlSensitivity": "relaxed"}"#).unwrap();
    assert!(!settings.enabled);
    assert_eq!(settings.url_sensitivity, UrlSensitivity::Relaxed);
    assert_eq!(settings.click_time_ms, 300);
    assert!(settings.direct_open);
}

#[test]
fn test_settings_serialize_camel_case() {
    let json = serde_json::to_value(Settings::default()).unwrap();
    assert!(json.get("directOpen").is_some());
    assert!(json.get("excludedDomains").is_some());
    assert!(json.get("clickDistancePx").is_some());
    assert!(json.get("direct_open").is_none());
}

#[test]
fn test_normalize_domain() {
    assert_eq!(normalize_domain("  WWW.Example.COM "), "example.com");
    assert_eq!(normalize_domain("example.com."), "example.com");
    assert_eq!(normalize_domain("sub.www.example.com"), "sub.www.example.com");
    assert_eq!(normalize_domain("www."), "");
}

#[test]
fn test_settings_normalized_drops_empty_entries() {
    let mut settings = Settings::default();
    settings.excluded_domains.insert("www.Example.com".to_string());
    settings.excluded_domains.insert("example.com".to_string());
    settings.excluded_domains.insert("   ".to_string());
    let settings = settings.normalized();
    assert_eq!(settings.excluded_domains.len(), 1);
    assert!(settings.excluded_domains.contains("example.com"));
}

#[test]
fn test_apply_reports_changes() {
    let mut settings = Settings::default();
    let patch = SettingsPatch {
        enabled: Some(false),
        debounce_ms: Some(500),
        click_time_ms: Some(450),
        ..Default::default()
    };
    let delta = settings.apply(&patch);
    assert_eq!(delta.enabled_transition, Some(false));
    assert!(!delta.multi_url_changed);
    assert_eq!(delta.changed_keys, vec!["enabled", "clickTimeMs"]);
    assert_eq!(settings.click_time_ms, 450);
}

#[test]
fn test_apply_normalizes_excluded_domains() {
    let mut settings = Settings::default();
    let patch = SettingsPatch {
        excluded_domains: Some(["WWW.News.Example".to_string()].into_iter().collect()),
        ..Default::default()
    };
    let delta = settings.apply(&patch);
    assert_eq!(delta.changed_keys, vec!["excludedDomains"]);
    assert!(settings.excluded_domains.contains("news.example"));
}

#[test]
fn test_apply_empty_patch_changes_nothing() {
    let mut settings = Settings::default();
    let patch = SettingsPatch::default();
    assert!(patch.is_empty());
    let delta = settings.apply(&patch);
    assert!(delta.is_empty());
    assert_eq!(delta.enabled_transition, None);
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_apply_multi_url_toggle() {
    let mut settings = Settings::default();
    let delta = settings.apply(&SettingsPatch {
        multi_url_support: Some(false),
        ..Default::default()
    });
    assert!(delta.multi_url_changed);
}

#[test]
fn test_patch_serializes_only_present_keys() {
    let patch = SettingsPatch::default().with_enabled(true);
    let json = serde_json::to_string(&patch).unwrap();
    assert_eq!(json, r#"{"enabled":true}"#);
}

#[test]
fn test_detector_settings_subset() {
    let mut settings = Settings::default();
    settings.click_distance_px = 12;
    settings.debug_mode = true;
    let detector = settings.detector_settings();
    assert_eq!(detector.click_distance_px, 12);
    assert!(detector.debug_mode);
    assert_eq!(DetectorSettings::default().click_time_ms, 300);
}

#[test]
fn test_host_config_default() {
    let config = HostConfig::default();
    assert_eq!(config.logging.level, "info");
    assert!(config.logging.directory.is_none());
    assert_eq!(config.queue.open_delay_ms, 100);
    assert_eq!(config.queue.max_pending, 0);
    assert!(config.settings_path.is_none());
}
