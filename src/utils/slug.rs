//! URL slugification.
//!
//! Converts post titles to the human-readable identifiers used in
//! `/post/:slug` routes.

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9_\-]+").unwrap());
static DASH_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").unwrap());

/// Convert a title to a URL slug.
///
/// Lowercases, turns whitespace runs into `-`, drops anything outside
/// `[a-z0-9_-]`, collapses repeated dashes and trims dashes at both ends.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let dashed = WHITESPACE.replace_all(&lowered, "-");
    let cleaned = NON_WORD.replace_all(&dashed, "");
    let collapsed = DASH_RUNS.replace_all(&cleaned, "-");
    collapsed.trim_matches('-').to_owned()
}
