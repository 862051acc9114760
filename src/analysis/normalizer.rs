//! Text normalization for extracted agreement text
//!
//! PDF and OCR output is full of hard line breaks, runs of spaces and
//! pagination footers. Everything downstream (term patterns, risk checks,
//! chunking) works on the normalized form.

use regex::Regex;
use std::sync::LazyLock;

/// "Page 3 of 10" style footers, any casing
static PAGE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bpage\s+\d+\s+of\s+\d+\b").expect("valid page marker regex"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Normalize raw extracted text.
///
/// Pagination markers are dropped and every whitespace run becomes a single
/// space. Case is preserved for display; matching is done case-insensitively
/// by the extractors.
pub fn normalize(raw: &str) -> String {
    let without_pages = PAGE_MARKER.replace_all(raw, " ");
    WHITESPACE_RUN
        .replace_all(&without_pages, " ")
        .trim()
        .to_string()
}

/// Lower-cased view used for substring checks.
pub fn matching_view(normalized: &str) -> String {
    normalized.to_lowercase()
}
