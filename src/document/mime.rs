//! MIME resolution
//!
//! Classifies uploaded bytes as one of the supported [`DocumentFormat`]s.
//! A specific declared type is trusted as-is; the generic sentinel falls back
//! to sniffing the leading signature of the content.

use std::io::Cursor;

use zip::ZipArchive;

use super::types::{DeclaredType, DocumentFormat};

/// PDF magic: `%PDF-`
const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// ZIP local file header
const ZIP_SIGNATURE: &[u8] = b"PK\x03\x04";

/// Main part of a word-processing package
const DOCX_MAIN_PART: &str = "word/document.xml";

/// Stateless resolver for document types
#[derive(Debug, Clone, Copy, Default)]
pub struct MimeResolver;

impl MimeResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the format of `bytes`
    ///
    /// Returns `None` when the content is unsupported, including an explicit
    /// declared type that names some other format.
    pub fn resolve(&self, bytes: &[u8], declared: &DeclaredType) -> Option<DocumentFormat> {
        match declared {
            DeclaredType::Explicit(mime) => DocumentFormat::from_mime(mime),
            DeclaredType::Detect => Self::sniff(bytes),
        }
    }

    /// Check that a resolution landed in the supported set
    pub fn validate(&self, resolved: Option<DocumentFormat>) -> bool {
        resolved.is_some_and(|format| DocumentFormat::ALL.contains(&format))
    }

    /// Classify content by its byte signature
    pub fn sniff(bytes: &[u8]) -> Option<DocumentFormat> {
        if bytes.starts_with(PDF_SIGNATURE) {
            return Some(DocumentFormat::Pdf);
        }

        // Many formats are ZIP containers (EPUB, XLSX, JAR); only a package
        // with a word-processing main part counts.
        if bytes.starts_with(ZIP_SIGNATURE) && is_word_package(bytes) {
            return Some(DocumentFormat::Docx);
        }

        None
    }
}

fn is_word_package(bytes: &[u8]) -> bool {
    match ZipArchive::new(Cursor::new(bytes)) {
        Ok(archive) => archive.file_names().any(|name| name == DOCX_MAIN_PART),
        Err(e) => {
            tracing::debug!("ZIP signature present but archive unreadable: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn zip_with(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
            let options = SimpleFileOptions::default();
            for (name, body) in entries {
                zip.start_file(*name, options).unwrap();
                zip.write_all(body.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buffer
    }

    #[test]
    fn test_sniff_pdf() {
        let resolver = MimeResolver::new();
        let resolved = resolver.resolve(b"%PDF-1.7\n%...", &DeclaredType::Detect);
        assert_eq!(resolved, Some(DocumentFormat::Pdf));
    }

    #[test]
    fn test_sniff_docx() {
        let bytes = zip_with(&[
            ("[Content_Types].xml", "<Types/>"),
            ("word/document.xml", "<w:document/>"),
        ]);
        assert_eq!(MimeResolver::sniff(&bytes), Some(DocumentFormat::Docx));
    }

    #[test]
    fn test_sniff_other_zip_is_unsupported() {
        let epub = zip_with(&[("mimetype", "application/epub+zip")]);
        assert_eq!(MimeResolver::sniff(&epub), None);

        let xlsx = zip_with(&[("xl/workbook.xml", "<workbook/>")]);
        assert_eq!(MimeResolver::sniff(&xlsx), None);
    }

    #[test]
    fn test_sniff_unknown_signatures() {
        assert_eq!(MimeResolver::sniff(b"\x89PNG\r\n\x1a\n"), None);
        assert_eq!(MimeResolver::sniff(b"plain text"), None);
        assert_eq!(MimeResolver::sniff(b""), None);
        assert_eq!(MimeResolver::sniff(b"PK\x03\x04garbage"), None);
    }

    #[test]
    fn test_declared_type_is_trusted_without_sniffing() {
        let resolver = MimeResolver::new();
        let declared = DeclaredType::Explicit("application/pdf".to_string());
        // Content is not a PDF, but the declared label wins
        assert_eq!(resolver.resolve(b"not a pdf", &declared), Some(DocumentFormat::Pdf));

        let png = DeclaredType::Explicit("image/png".to_string());
        assert_eq!(resolver.resolve(b"%PDF-1.4", &png), None);
    }

    #[test]
    fn test_validate() {
        let resolver = MimeResolver::new();
        assert!(resolver.validate(Some(DocumentFormat::Pdf)));
        assert!(resolver.validate(Some(DocumentFormat::Docx)));
        assert!(!resolver.validate(None));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let resolver = MimeResolver::new();
        let bytes = zip_with(&[("word/document.xml", "<w:document/>")]);
        let first = resolver.resolve(&bytes, &DeclaredType::Detect);
        for _ in 0..5 {
            assert_eq!(resolver.resolve(&bytes, &DeclaredType::Detect), first);
        }
    }
}
