// DOCX text extraction.
//
// A .docx file is a zip archive; the document body is WordprocessingML in
// word/document.xml. We only need paragraph text, so instead of a full XML
// parser we scan for <w:p> elements and collect their <w:t> runs. Each
// paragraph becomes one line, and empty paragraphs become blank lines, which
// keeps section boundaries intact for the section-level comparison.

use std::io::{Cursor, Read};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex_lite::Regex;

/// A whole paragraph: `<w:p/>` or `<w:p ...>...</w:p>`.
static PARAGRAPH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:p(?:\s[^>]*?)?(?:/>|>.*?</w:p>)").expect("valid paragraph regex")
});

/// Paragraph properties. Tab stop definitions live here and must not be
/// read as tab characters.
static PROPERTIES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<w:pPr>.*?</w:pPr>").expect("valid properties regex"));

/// Pieces of paragraph content: text runs, tabs and line breaks.
static RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>|<w:(tab|br|cr)\b[^>]*/>")
        .expect("valid run regex")
});

/// Extract paragraph text from DOCX bytes.
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).context("DOCX is not a valid zip archive")?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .context("DOCX is missing word/document.xml")?
        .read_to_string(&mut xml)
        .context("Failed to read word/document.xml")?;

    Ok(paragraphs_from_xml(&xml).join("\n").trim().to_string())
}

/// Collect the text of every paragraph in a WordprocessingML body.
pub fn paragraphs_from_xml(xml: &str) -> Vec<String> {
    PARAGRAPH_RE
        .find_iter(xml)
        .map(|p| paragraph_text(p.as_str()))
        .collect()
}

fn paragraph_text(paragraph: &str) -> String {
    let content = PROPERTIES_RE.replace_all(paragraph, "");
    let mut text = String::new();
    for caps in RUN_RE.captures_iter(&content) {
        if let Some(run) = caps.get(1) {
            text.push_str(&decode_entities(run.as_str()));
        } else {
            match caps.get(2).map(|m| m.as_str()) {
                Some("tab") => text.push('\t'),
                _ => text.push('\n'),
            }
        }
    }
    text
}

/// Decode the five predefined XML entities. `&amp;` goes last so that
/// `&amp;lt;` decodes to the literal `&lt;`.
fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
