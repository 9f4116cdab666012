//! Core document types
//!
//! The closed set of formats the comparison service accepts, and the
//! caller-declared type that accompanies each uploaded document.

/// MIME type of PDF documents
pub const PDF_MIME: &str = "application/pdf";

/// MIME type of Office Open XML word-processing documents
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Generic MIME type that carries no format information
pub const OCTET_STREAM_MIME: &str = "application/octet-stream";

/// Document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// All supported formats
    pub const ALL: [DocumentFormat; 2] = [DocumentFormat::Pdf, DocumentFormat::Docx];

    /// Map a MIME string or short token to a format
    ///
    /// Parameters after `;` are ignored and matching is case-insensitive.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_lowercase();
        match essence.as_str() {
            PDF_MIME | "pdf" => Some(Self::Pdf),
            DOCX_MIME | "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    /// Canonical MIME type
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Pdf => PDF_MIME,
            Self::Docx => DOCX_MIME,
        }
    }

    /// Short human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => ".pdf",
            Self::Docx => ".docx",
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime())
    }
}

/// Type indicator supplied by the caller alongside a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredType {
    /// No usable label; the content must be sniffed
    Detect,
    /// A specific MIME string, trusted as-is
    Explicit(String),
}

impl DeclaredType {
    /// Interpret an optional caller-supplied type string
    ///
    /// Absent or empty values, `application/octet-stream`, `detect` and
    /// `auto` are treated as the generic sentinel.
    pub fn from_header(value: Option<&str>) -> Self {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Self::Detect;
        };

        let essence = value.split(';').next().unwrap_or("").trim().to_lowercase();
        match essence.as_str() {
            OCTET_STREAM_MIME | "detect" | "auto" => Self::Detect,
            _ => Self::Explicit(value.to_string()),
        }
    }
}

impl Default for DeclaredType {
    fn default() -> Self {
        Self::Detect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mime() {
        assert_eq!(DocumentFormat::from_mime(PDF_MIME), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_mime(DOCX_MIME), Some(DocumentFormat::Docx));
        assert_eq!(
            DocumentFormat::from_mime("Application/PDF; charset=binary"),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(DocumentFormat::from_mime("docx"), Some(DocumentFormat::Docx));
        assert_eq!(DocumentFormat::from_mime("application/epub+zip"), None);
        assert_eq!(DocumentFormat::from_mime(""), None);
    }


    #[test]
    fn test_declared_type_sentinels() {
        assert_eq!(DeclaredType::from_header(None), DeclaredType::Detect);
        assert_eq!(DeclaredType::from_header(Some("  ")), DeclaredType::Detect);
        assert_eq!(
            DeclaredType::from_header(Some("application/octet-stream")),
            DeclaredType::Detect
        );
        assert_eq!(DeclaredType::from_header(Some("detect")), DeclaredType::Detect);
        assert_eq!(
            DeclaredType::from_header(Some("application/pdf")),
            DeclaredType::Explicit("application/pdf".to_string())
        );
    }
}
