// Text normalization and tokenization shared by skill matching and the
// TF-IDF embedder.
//
// Tokens keep the punctuation that shows up inside technology names
// (`c++`, `c#`, `ci/cd`, `node.js`, `scikit-learn`) so those survive as a
// single unit instead of being shredded into letters.

use std::sync::LazyLock;

use regex_lite::Regex;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z0-9][a-z0-9+#./\-]*").expect("valid token regex"));

static SENTENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?;:]\s+|\n+|•").expect("valid sentence regex"));

/// Lowercase the text and collapse every run of whitespace to one space.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split already-lowercased text into tokens.
///
/// Trailing `.`, `/` and `-` are stripped so sentence punctuation doesn't
/// stick to the last word ("python." -> "python"), while inner punctuation
/// and trailing `+`/`#` are kept.
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(['.', '/', '-']).to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Split raw text into sentence-like fragments (lines, bullets, sentences).
/// Empty fragments are dropped.
pub fn sentences(text: &str) -> Vec<String> {
    SENTENCE_RE
        .split(text)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
