//! # Tabsling Lexer
//!
//! Pure functions that decide whether a piece of text looks like a URL,
//! normalize it into something a tab can be opened with, and pull every
//! candidate URL out of a free-form selection.
//!
//! Nothing here holds state. The arbiter calls into this crate with the
//! sensitivity profile from the live settings on every request.
//!
//! ## Matching policy
//!
//! A candidate is found by trying the sensitivity pattern at the start of
//! each whitespace-separated token, left to right. The pattern is a
//! *prefix* match: `example.com,` and `example.com)` both yield
//! `example.com`, and the rest of the line is ignored.

mod lexer;
mod sensitivity;

pub use lexer::{extract_candidates, find_candidate, is_candidate_url, normalize};
pub use sensitivity::{ParseSensitivityError, UrlSensitivity};

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;
