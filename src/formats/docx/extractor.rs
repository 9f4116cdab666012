//! DOCX text extraction
//!
//! Opens the OOXML package with `zip` and streams `word/document.xml` with
//! `quick-xml`, collecting run text in document order. Each paragraph is
//! followed by a blank line; `w:tab` becomes a tab and `w:br`/`w:cr` a line
//! break. Formatting, tables and images are not represented.

use std::io::{Cursor, Read};

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::cancel::CancellationFlag;
use crate::document::{DocumentError, DocumentFormat, DocumentResult, TextExtractor};

/// Main document part inside the package
const MAIN_PART: &str = "word/document.xml";

/// Upper bound on the decompressed main part (guards against ZIP bombs)
const MAX_MAIN_PART_BYTES: u64 = 64 * 1024 * 1024;

/// Paragraph separator
const PARAGRAPH_BREAK: &str = "\n\n";

/// Extracts raw text from word-processing documents
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxTextExtractor;

impl DocxTextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous extraction, for callers already on a blocking thread
    pub fn extract_blocking(data: &[u8], cancel: &CancellationFlag) -> DocumentResult<String> {
        let xml = read_main_part(data, MAX_MAIN_PART_BYTES)?;
        if cancel.is_cancelled() {
            return Err(DocumentError::Cancelled);
        }
        collect_text(&xml, cancel)
    }
}

#[async_trait]
impl TextExtractor for DocxTextExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Docx
    }

    async fn extract(&self, data: Vec<u8>, cancel: CancellationFlag) -> DocumentResult<String> {
        tokio::task::spawn_blocking(move || Self::extract_blocking(&data, &cancel))
            .await
            .map_err(|e| DocumentError::TaskFailed(format!("Task join error: {}", e)))?
    }
}

/// Read the main part, failing if it decompresses to more than `limit` bytes
fn read_main_part(data: &[u8], limit: u64) -> DocumentResult<String> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;

    let part = archive.by_name(MAIN_PART).map_err(|e| match e {
        ZipError::FileNotFound => DocumentError::MissingPart(MAIN_PART.to_string()),
        other => DocumentError::from(other),
    })?;

    let mut xml = String::new();
    let read = part
        .take(limit.saturating_add(1))
        .read_to_string(&mut xml)
        .map_err(|e| DocumentError::InvalidContent(format!("Failed to read {}: {}", MAIN_PART, e)))?;

    if read as u64 > limit {
        return Err(DocumentError::InvalidContent(format!(
            "{} exceeds {} bytes",
            MAIN_PART, limit
        )));
    }

    Ok(xml)
}

/// Collect run text, checking for cancellation after every paragraph
fn collect_text(xml: &str, cancel: &CancellationFlag) -> DocumentResult<String> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"t" => in_text_run = true,
                b"tab" => text.push('\t'),
                b"br" | b"cr" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"p" => end_paragraph(&mut text, cancel)?,
                b"tab" => text.push('\t'),
                b"br" | b"cr" => text.push('\n'),
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => end_paragraph(&mut text, cancel)?,
                _ => {}
            },
            Event::Text(t) if in_text_run => {
                text.push_str(&t.unescape()?);
            }
            Event::CData(t) if in_text_run => {
                text.push_str(&String::from_utf8_lossy(&t));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

fn end_paragraph(text: &mut String, cancel: &CancellationFlag) -> DocumentResult<()> {
    if cancel.is_cancelled() {
        return Err(DocumentError::Cancelled);
    }
    text.push_str(PARAGRAPH_BREAK);
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    /// Build a minimal DOCX package whose body holds one paragraph per entry
    pub(crate) fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| {
                format!(
                    r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
                    p.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
                )
            })
            .collect();
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        );

        let mut buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
            let options = SimpleFileOptions::default();
            zip.start_file("[Content_Types].xml", options).unwrap();
            zip.write_all(b"<?xml version=\"1.0\"?><Types/>").unwrap();
            zip.start_file(MAIN_PART, options).unwrap();
            zip.write_all(document.as_bytes()).unwrap();
            zip.finish().unwrap();
        }
        buffer
    }

    #[test]
    fn test_extracts_paragraphs() {
        let docx = build_docx(&["First paragraph", "Second & last"]);
        let text = DocxTextExtractor::extract_blocking(&docx, &CancellationFlag::new()).unwrap();
        assert_eq!(text, "First paragraph\n\nSecond & last\n\n");
    }

    #[test]
    fn test_runs_tabs_and_breaks() {
        let xml = r#"<w:document xmlns:w="w"><w:body>
<w:p><w:r><w:t>Name</w:t></w:r><w:r><w:tab/><w:t xml:space="preserve">Value </w:t></w:r><w:r><w:br/><w:t>next</w:t></w:r></w:p>
<w:p/>
</w:body></w:document>"#;
        let text = collect_text(xml, &CancellationFlag::new()).unwrap();
        assert_eq!(text, "Name\tValue \nnext\n\n\n\n");
    }

    #[test]
    fn test_text_outside_runs_is_ignored() {
        let xml = r#"<w:document xmlns:w="w"><w:body><w:p><w:instrText>TOC</w:instrText><w:r><w:t>kept</w:t></w:r></w:p></w:body></w:document>"#;
        assert_eq!(collect_text(xml, &CancellationFlag::new()).unwrap(), "kept\n\n");
    }

    #[test]
    fn test_missing_main_part() {
        let mut buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
            zip.start_file("other.xml", SimpleFileOptions::default()).unwrap();
            zip.write_all(b"<x/>").unwrap();
            zip.finish().unwrap();
        }
        let err = DocxTextExtractor::extract_blocking(&buffer, &CancellationFlag::new()).unwrap_err();
        assert!(matches!(err, DocumentError::MissingPart(_)));
    }

    #[test]
    fn test_corrupt_container() {
        let err = DocxTextExtractor::extract_blocking(b"PK\x03\x04not a zip", &CancellationFlag::new())
            .unwrap_err();
        assert!(matches!(err, DocumentError::Open { .. }));
    }

    #[test]
    fn test_cancelled_before_parse() {
        let docx = build_docx(&["text"]);
        let cancel = CancellationFlag::new();
        cancel.cancel();
        let err = DocxTextExtractor::extract_blocking(&docx, &cancel).unwrap_err();
        assert!(matches!(err, DocumentError::Cancelled));
    }

    #[test]
    fn test_cancelled_between_paragraphs() {
        let xml = r#"<w:document xmlns:w="w"><w:body><w:p><w:r><w:t>one</w:t></w:r></w:p><w:p><w:r><w:t>two</w:t></w:r></w:p></w:body></w:document>"#;
        let cancel = CancellationFlag::new();
        cancel.cancel();
        let err = collect_text(xml, &cancel).unwrap_err();
        assert!(matches!(err, DocumentError::Cancelled));
    }

    #[test]
    fn test_oversized_main_part_rejected() {
        let docx = build_docx(&["first paragraph", "second paragraph"]);

        let err = read_main_part(&docx, 64).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidContent(_)));

        let xml = read_main_part(&docx, MAX_MAIN_PART_BYTES).unwrap();
        let exact = read_main_part(&docx, xml.len() as u64).unwrap();
        assert_eq!(exact, xml);
        assert!(read_main_part(&docx, xml.len() as u64 - 1).is_err());
    }

    #[tokio::test]
    async fn test_async_extract() {
        let docx = build_docx(&["async"]);
        let text = DocxTextExtractor::new()
            .extract(docx, CancellationFlag::new())
            .await
            .unwrap();
        assert_eq!(text, "async\n\n");
    }
}
