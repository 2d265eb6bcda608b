use super::*;

#[test]
fn test_empty_and_whitespace_are_not_candidates() {
    for sensitivity in [UrlSensitivity::Strict, UrlSensitivity::Standard, UrlSensitivity::Relaxed] {
        assert!(!is_candidate_url("", sensitivity));
        assert!(!is_candidate_url("   \n\t ", sensitivity));
    }
}

#[test]
fn test_strict_requires_scheme_or_www() {
    let s = UrlSensitivity::Strict;
    assert!(is_candidate_url("https://example.com", s));
    assert!(is_candidate_url("www.example.com/path?q=1", s));
    assert!(is_candidate_url("http://www.example.org", s));
    assert!(!is_candidate_url("example.com", s));
    assert!(!is_candidate_url("localhost:8080", s));
    assert!(!is_candidate_url("https://example.verylongtld", s));
}

#[test]
fn test_standard_accepts_bare_domains_localhost_and_ipv4() {
    let s = UrlSensitivity::Standard;
    assert!(is_candidate_url("example.com", s));
    assert!(is_candidate_url("sub.example-site.co.uk:8443/a/b", s));
    assert!(is_candidate_url("localhost", s));
    assert!(is_candidate_url("localhost:3000/dashboard", s));
    assert!(is_candidate_url("192.168.1.20:8080", s));
    assert!(is_candidate_url("https://example.com", s));
    assert!(is_candidate_url("file:///home/user/notes.txt", s));
    assert!(!is_candidate_url("intranet", s));
    assert!(!is_candidate_url("hello world", s));
    assert!(!is_candidate_url("e.g. nothing", s));
}

#[test]
fn test_hosts_starting_like_localhost_or_ipv4_are_kept_whole() {
    let s = UrlSensitivity::Standard;
    assert_eq!(extract_candidates("localhost.run", s), vec!["https://localhost.run"]);
    assert_eq!(
        extract_candidates("localhost-dev.example.com/app", s),
        vec!["https://localhost-dev.example.com/app"]
    );
    assert_eq!(
        extract_candidates("10.0.0.1.nip.io:8080", s),
        vec!["https://10.0.0.1.nip.io:8080"]
    );
    assert_eq!(
        extract_candidates("localhost-dev.example.com", UrlSensitivity::Relaxed),
        vec!["https://localhost-dev.example.com"]
    );
}

#[test]
fn test_localhost_and_ipv4_followed_by_name_characters_are_rejected() {
    let s = UrlSensitivity::Standard;
    assert_eq!(find_candidate("localhost-dev", s), None);
    assert_eq!(find_candidate("10.0.0.1-x", s), None);
    // Sentence punctuation still ends the host.
    assert_eq!(find_candidate("open localhost.", s), Some("localhost"));
    assert_eq!(find_candidate("ping 10.0.0.1, then", s), Some("10.0.0.1"));
    assert_eq!(find_candidate("localhost:3000/x", s), Some("localhost:3000/x"));
}

#[test]
fn test_relaxed_accepts_single_word_hosts() {
    assert!(is_candidate_url("intranet", UrlSensitivity::Relaxed));
    assert!(is_candidate_url("intranet/wiki", UrlSensitivity::Relaxed));
    assert!(!is_candidate_url("intranet", UrlSensitivity::Standard));
}

// Prefix matching is deliberately permissive: anything after a valid
// looking domain is ignored instead of rejecting the whole line.
#[test]
fn test_prefix_match_tolerates_trailing_text() {
    let s = UrlSensitivity::Standard;
    assert_eq!(find_candidate("example.com today", s), Some("example.com"));
    assert_eq!(find_candidate("example.com, and more", s), Some("example.com"));
    assert_eq!(find_candidate("visit example.com today", s), Some("example.com"));
    assert_eq!(find_candidate("example.com/docs) see", s), Some("example.com/docs)"));
}

#[test]
fn test_find_candidate_takes_first_token_match() {
    assert_eq!(
        find_candidate("a.io then b.io", UrlSensitivity::Standard),
        Some("a.io")
    );
    assert_eq!(
        find_candidate("visit example.com", UrlSensitivity::Relaxed),
        Some("visit")
    );
}

#[test]
fn test_normalize_prefixes_scheme() {
    assert_eq!(normalize("example.com"), "https://example.com");
    assert_eq!(normalize("www.example.com/a"), "https://www.example.com/a");
    assert_eq!(normalize("localhost"), "http://localhost");
    assert_eq!(normalize("localhost:3000/x"), "http://localhost:3000/x");
    assert_eq!(normalize("localhostify.com"), "https://localhostify.com");
}

#[test]
fn test_normalize_keeps_scheme_bearing_input() {
    for url in [
        "http://example.com",
        "https://example.com/x?y#z",
        "file:///tmp/a.txt",
        "HTTPS://EXAMPLE.COM",
    ] {
        assert_eq!(normalize(url), url);
    }
}

#[test]
fn test_normalize_is_idempotent() {
    for url in [
        "",
        "example.com",
        "localhost:80",
        "https://a.b",
        "ftp://files.example.com",
        "not a url at all",
        "file:///x",
    ] {
        let once = normalize(url);
        assert_eq!(normalize(&once), once, "not idempotent for {:?}", url);
    }
}

#[test]
fn test_extract_candidates_preserves_order_and_duplicates() {
    let text = "b.example.com\n\n  a.example.com  \nnot a url\nb.example.com\r\nlocalhost:9000";
    let urls = extract_candidates(text, UrlSensitivity::Standard);
    assert_eq!(
        urls,
        vec![
            "https://b.example.com",
            "https://a.example.com",
            "https://b.example.com",
            "http://localhost:9000",
        ]
    );
}

#[test]
fn test_extract_candidates_respects_sensitivity() {
    let text = "https://a.com\nb.com\nwiki";
    assert_eq!(extract_candidates(text, UrlSensitivity::Strict), vec!["https://a.com"]);
    assert_eq!(
        extract_candidates(text, UrlSensitivity::Standard),
        vec!["https://a.com", "https://b.com"]
    );
    assert_eq!(
        extract_candidates(text, UrlSensitivity::Relaxed),
        vec!["https://a.com", "https://b.com", "https://wiki"]
    );
}

#[test]
fn test_sensitivity_parse_and_display() {
    assert_eq!("STRICT".parse::<UrlSensitivity>().unwrap(), UrlSensitivity::Strict);
    assert_eq!(" relaxed ".parse::<UrlSensitivity>().unwrap(), UrlSensitivity::Relaxed);
    assert!("loose".parse::<UrlSensitivity>().is_err());
    assert_eq!(UrlSensitivity::Standard.to_string(), "standard");
    assert_eq!(UrlSensitivity::default(), UrlSensitivity::Standard);
}
