// Document parsing tests — real files on disk, including a generated DOCX.

use std::io::Write;
use std::path::PathBuf;

use tailor::documents::{parse_bytes, parse_document, DocumentFormat};
use zip::write::{FileOptions, ZipWriter};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tailor-docs-{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// A minimal DOCX: just the zip container and word/document.xml.
fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!(r#"<w:p><w:pPr><w:pStyle w:val="Normal"/></w:pPr><w:r><w:t xml:space="preserve">{p}</w:t></w:r></w:p>"#))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );

    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    zip.start_file::<_, ()>("[Content_Types].xml", FileOptions::default())
        .unwrap();
    zip.write_all(b"<Types/>").unwrap();
    zip.start_file::<_, ()>("word/document.xml", FileOptions::default())
        .unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

// ============================================================
// DOCX
// ============================================================

#[test]
fn docx_file_parses_to_paragraph_lines() {
    let dir = scratch_dir("docx");
    let path = dir.join("resume.docx");
    std::fs::write(
        &path,
        build_docx(&["Jane Doe", "Rust &amp; Python engineer", "Skills: Docker, Git"]),
    )
    .unwrap();

    let doc = parse_document(&path).unwrap();
    assert_eq!(doc.name, "resume.docx");
    assert_eq!(doc.format, DocumentFormat::Docx);
    assert_eq!(doc.text, "Jane Doe\nRust & Python engineer\nSkills: Docker, Git");

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn docx_without_text_is_an_error() {
    let err = parse_bytes(&build_docx(&[]), DocumentFormat::Docx).unwrap_err();
    assert!(err.to_string().contains("No extractable text"));
}

#[test]
fn zip_without_document_xml_is_an_error() {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    zip.start_file::<_, ()>("other.xml", FileOptions::default())
        .unwrap();
    zip.write_all(b"<x/>").unwrap();
    let bytes = zip.finish().unwrap().into_inner();

    assert!(parse_bytes(&bytes, DocumentFormat::Docx).is_err());
}

// ============================================================
// Text files and dispatch
// ============================================================

#[test]
fn text_file_is_read_and_trimmed() {
    let dir = scratch_dir("txt");
    let path = dir.join("jd.TXT");
    std::fs::write(&path, "\n\nSenior Rust Engineer\n\nKubernetes required\n").unwrap();

    let doc = parse_document(&path).unwrap();
    assert_eq!(doc.format, DocumentFormat::Text);
    assert_eq!(doc.text, "Senior Rust Engineer\n\nKubernetes required");

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = scratch_dir("unsupported");
    let path = dir.join("resume.odt");
    std::fs::write(&path, "whatever").unwrap();

    let err = parse_document(&path).unwrap_err();
    assert!(err.to_string().contains("Unsupported file type"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_file_is_rejected() {
    let path = std::env::temp_dir().join("tailor-docs-definitely-missing.pdf");
    let err = parse_document(&path).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn garbage_pdf_is_an_error_not_a_panic() {
    assert!(parse_bytes(b"%PDF-1.4 not really a pdf", DocumentFormat::Pdf).is_err());
}
