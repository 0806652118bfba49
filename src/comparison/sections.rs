// Documents break into sections at blank lines.

use std::sync::LazyLock;

use regex_lite::Regex;

/// Two or more line breaks, with only whitespace between them.
static BLANK_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n\s*").expect("valid blank line regex"));

/// Split text into trimmed, non-empty sections separated by blank lines.
pub fn split_sections(text: &str) -> Vec<String> {
    let text = text.replace("\r\n", "\n");
    BLANK_LINE_RE
        .split(&text)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
