use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static TAG_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;\n]+").unwrap());
static WHITESPACE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalize raw tag text into Anki-ready tag tokens.
///
/// Splits on commas, semicolons, and newlines; trims whitespace; joins
/// multi-word tags with dashes; drops empties. Deduplication compares
/// lowercased tokens but keeps the first-seen casing, preserving order.
pub fn normalize_tags(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tokens = Vec::new();

    for part in TAG_SPLIT_RE.split(raw) {
        let candidate = part.trim();
        if candidate.is_empty() {
            continue;
        }
        let token = WHITESPACE_RUN_RE.replace_all(candidate, "-");
        let token = token.trim_matches(|c| c == ',' || c == ';');
        if token.is_empty() {
            continue;
        }
        if seen.insert(token.to_lowercase()) {
            tokens.push(token.to_string());
        }
    }

    tokens
}
