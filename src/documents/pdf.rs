// PDF text extraction via pdf-extract.

use anyhow::Result;

/// Extract the text layer of a PDF, one page after another.
///
/// pdf-extract panics on some malformed inputs rather than returning an
/// error, so the call is wrapped in `catch_unwind` and turned into an error.
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let result = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes));

    match result {
        Ok(Ok(text)) => Ok(clean_page_breaks(&text)),
        Ok(Err(e)) => anyhow::bail!("Failed to extract PDF text: {e}"),
        Err(_) => anyhow::bail!("Failed to extract PDF text: the file appears to be malformed"),
    }
}

/// Form feeds separate pages in the extracted text; turn them into newlines
/// so page boundaries behave like line breaks downstream.
fn clean_page_breaks(text: &str) -> String {
    text.replace('\u{c}', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_is_error() {
        assert!(extract_text(b"definitely not a pdf").is_err());
    }

    #[test]
    fn test_clean_page_breaks() {
        assert_eq!(clean_page_breaks("page one\u{c}page two"), "page one\npage two");
    }
}
