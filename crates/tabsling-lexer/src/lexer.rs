//! URL candidate detection and normalization.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::sensitivity::UrlSensitivity;

/// One DNS label: alphanumeric ends, hyphens allowed inside.
const LABEL: &str = r"[a-z0-9](?:[a-z0-9-]*[a-z0-9])?";

/// Optional port followed by an optional path, query or fragment.
const PORT_AND_PATH: &str = r"(?::\d{1,5})?(?:[/?#]\S*)?";

/// Schemes accepted in front of a candidate.
const SCHEME: &str = r"(?:https?|file)://";

const IPV4: &str = r"(?:\d{1,3}\.){3}\d{1,3}";

/// Dotted name ending in an alphabetic top-level label.
const DOMAIN: &str = r"(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z]{2,}\b";

/// Schemes `normalize` leaves alone.
const KNOWN_PREFIXES: [&str; 3] = ["http://", "https://", "file://"];

static STRICT: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"^(?:https?://(?:www\.)?|www\.)(?:{LABEL}\.)+[a-z]{{2,6}}\b{PORT_AND_PATH}"
    ))
});

static STANDARD: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"^(?:file:///\S*|(?:{SCHEME})?(?:{DOMAIN}|(?P<bare>localhost|{IPV4})\b){PORT_AND_PATH})"
    ))
});

static RELAXED: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"^(?:file:///\S*|(?:{SCHEME})?(?:{DOMAIN}|(?P<bare>{IPV4})\b|{LABEL}\b){PORT_AND_PATH})"
    ))
});

fn compile(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("URL candidate pattern must compile")
}

fn pattern_for(sensitivity: UrlSensitivity) -> &'static Regex {
    match sensitivity {
        UrlSensitivity::Strict => &STRICT,
        UrlSensitivity::Standard => &STANDARD,
        UrlSensitivity::Relaxed => &RELAXED,
    }
}

/// Byte offsets where a whitespace-separated token begins.
fn token_starts(text: &str) -> impl Iterator<Item = usize> + '_ {
    let mut previous_was_space = true;
    text.char_indices().filter_map(move |(idx, ch)| {
        let starts = previous_was_space && !ch.is_whitespace();
        previous_was_space = ch.is_whitespace();
        starts.then_some(idx)
    })
}

/// Find the first URL-shaped span in `text`.
///
/// The pattern is tried at the start of every token and only needs to
/// match a prefix of what follows, so trailing punctuation or words do not
/// disqualify a match.
pub fn find_candidate(text: &str, sensitivity: UrlSensitivity) -> Option<&str> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let pattern = pattern_for(sensitivity);
    token_starts(text).find_map(|start| {
        let rest = &text[start..];
        let caps = pattern.captures(rest)?;
        if let Some(bare) = caps.name("bare") {
            if continues_host(&rest[bare.end()..]) {
                return None;
            }
        }
        caps.get(0).map(|m| &rest[..m.end()])
    })
}

/// Whether `after` carries on a hostname: `localhost` or a dotted quad
/// followed by `-label` or `.label` is the start of a longer name.
fn continues_host(after: &str) -> bool {
    let mut chars = after.chars();
    match chars.next() {
        Some('-') => true,
        Some('.') => chars.next().is_some_and(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

/// Whether `text` contains something that looks like a URL.
pub fn is_candidate_url(text: &str, sensitivity: UrlSensitivity) -> bool {
    find_candidate(text, sensitivity).is_some()
}

fn is_localhost(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    match lower.strip_prefix("localhost") {
        Some(rest) => rest.is_empty() || rest.starts_with(':') || rest.starts_with('/'),
        None => false,
    }
}

/// Give a candidate a scheme.
///
/// Input that already carries `http://`, `https://` or `file://` is returned
/// untouched. `localhost` gets `http://`, everything else `https://`.
pub fn normalize(url: &str) -> String {
    let lower = url.to_ascii_lowercase();
    if KNOWN_PREFIXES.iter().any(|prefix| lower.starts_with(prefix)) {
        return url.to_string();
    }

    if is_localhost(url) {
        format!("http://{}", url)
    } else {
        format!("https://{}", url)
    }
}

/// Extract one normalized URL per matching line, in line order.
///
/// Duplicates are kept: every matching line becomes one open.
pub fn extract_candidates(text: &str, sensitivity: UrlSensitivity) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| find_candidate(line, sensitivity))
        .map(normalize)
        .collect()
}
