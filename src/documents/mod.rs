// Document parsing — turns resumes and job descriptions into plain text.
//
// PDF text comes from the document's text layer (no OCR). DOCX is a zip
// container; the body lives in word/document.xml. Plain text files are read
// as-is with lossy UTF-8 decoding.

pub mod docx;
pub mod format;
pub mod pdf;

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use format::DocumentFormat;

/// A document that has been read and reduced to plain text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// File name (without directories) the text came from
    pub name: String,
    pub format: DocumentFormat,
    pub text: String,
}

/// Parse a document from disk, dispatching on its extension.
pub fn parse_document(path: &Path) -> Result<ParsedDocument> {
    if !path.exists() {
        anyhow::bail!("File {} does not exist", path.display());
    }

    let format = DocumentFormat::from_path(path).ok_or_else(|| {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        anyhow::anyhow!(
            "Unsupported file type {:?} for {}. Supported: pdf, docx, txt",
            ext,
            path.display()
        )
    })?;

    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let text = parse_bytes(&bytes, format)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    debug!(
        name = %name,
        format = format.as_str(),
        chars = text.chars().count(),
        "Parsed document"
    );

    Ok(ParsedDocument { name, format, text })
}

/// Parse in-memory document bytes. Used for uploads, where there is no path.
///
/// The returned text is trimmed and guaranteed non-empty.
pub fn parse_bytes(bytes: &[u8], format: DocumentFormat) -> Result<String> {
    let text = match format {
        DocumentFormat::Pdf => pdf::extract_text(bytes)?,
        DocumentFormat::Docx => docx::extract_text(bytes)?,
        DocumentFormat::Text => String::from_utf8_lossy(bytes).into_owned(),
    };

    let text = text.trim();
    if text.is_empty() {
        anyhow::bail!(
            "No extractable text found in {} document (scanned PDFs need OCR first)",
            format.as_str()
        );
    }

    Ok(text.to_string())
}
