//! Document error types
//!
//! Errors raised while turning document bytes into plain text.

use thiserror::Error;

use super::types::DocumentFormat;

/// Text extraction error
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Container or document structure could not be opened
    #[error("Failed to open {format} document: {message}")]
    Open {
        format: DocumentFormat,
        message: String,
    },

    /// Document opened but its content could not be read
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Required part missing from a package
    #[error("Missing document part: {0}")]
    MissingPart(String),

    /// Invalid content (encoding, format)
    #[error("Invalid content: {0}")]
    InvalidContent(String),

    /// MuPDF context error
    #[error("MuPDF context error: {0}")]
    ContextError(String),

    /// Blocking task failed to complete
    #[error("Extraction task failed: {0}")]
    TaskFailed(String),

    /// The request was abandoned while extracting
    #[error("Extraction cancelled")]
    Cancelled,
}

/// Result type alias for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Alias for Result
pub type DocumentResult<T> = Result<T>;

impl From<mupdf::Error> for DocumentError {
    fn from(err: mupdf::Error) -> Self {
        DocumentError::ContextError(err.to_string())
    }
}

impl From<zip::result::ZipError> for DocumentError {
    fn from(err: zip::result::ZipError) -> Self {
        DocumentError::Open {
            format: DocumentFormat::Docx,
            message: err.to_string(),
        }
    }
}

impl From<quick_xml::Error> for DocumentError {
    fn from(err: quick_xml::Error) -> Self {
        DocumentError::ParseError(err.to_string())
    }
}
