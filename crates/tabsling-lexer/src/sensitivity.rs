//! URL sensitivity profiles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How eagerly text is treated as a URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlSensitivity {
    /// Scheme or `www.` prefix plus a short top-level label.
    Strict,
    /// Bare domains, `localhost` and dotted-quad IPv4, scheme optional.
    #[default]
    Standard,
    /// Everything `Standard` accepts plus single-word hostnames.
    Relaxed,
}

impl fmt::Display for UrlSensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlSensitivity::Strict => write!(f, "strict"),
            UrlSensitivity::Standard => write!(f, "standard"),
            UrlSensitivity::Relaxed => write!(f, "relaxed"),
        }
    }
}

/// Unknown sensitivity name.
#[derive(Debug, Error)]
#[error("Unknown URL sensitivity: {0} (expected strict, standard or relaxed)")]
pub struct ParseSensitivityError(pub String);

impl FromStr for UrlSensitivity {
    type Err = ParseSensitivityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(UrlSensitivity::Strict),
            "standard" => Ok(UrlSensitivity::Standard),
            "relaxed" => Ok(UrlSensitivity::Relaxed),
            other => Err(ParseSensitivityError(other.to_string())),
        }
    }
}
