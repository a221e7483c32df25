use regex::Regex;
use std::sync::LazyLock;

static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_/]+").unwrap());
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s']").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static LIST_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*(?:[,;|\n]|\band\b|\bwith\b|&)\s*").unwrap());

/// Canonical form of a descriptor or processing tag.
/// Lowercase, hyphens/underscores/slashes become spaces, punctuation is
/// dropped and internal whitespace collapses. "Pan-Fired" → "pan fired".
pub fn normalize(term: &str) -> String {
    let lowered = term.to_lowercase();
    let spaced = SEPARATORS.replace_all(&lowered, " ");
    let cleaned = NON_WORD.replace_all(&spaced, " ");
    WHITESPACE.replace_all(cleaned.trim(), " ").to_string()
}

/// Normalize every term, dropping the ones that end up empty.
pub fn normalize_all<S: AsRef<str>>(terms: &[S]) -> Vec<String> {
    terms
        .iter()
        .map(|t| normalize(t.as_ref()))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Split free text such as "floral, honey and light citrus" into terms.
/// Splits on commas, semicolons, pipes, newlines, "&", "and", "with".
pub fn parse_list(text: &str) -> Vec<String> {
    LIST_SPLIT
        .split(text)
        .map(normalize)
        .filter(|t| !t.is_empty())
        .collect()
}

/// True when `needle` occurs in `term` as a whole word or word sequence.
pub fn mentions(term: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    if term == needle {
        return true;
    }
    format!(" {term} ").contains(&format!(" {needle} "))
}
