//! PDF text extraction
//!
//! Uses MuPDF via [`SafeDocument`] on the blocking pool.

use async_trait::async_trait;

use crate::cancel::CancellationFlag;
use crate::document::{DocumentError, DocumentFormat, DocumentResult, TextExtractor};
use crate::mupdf::SafeDocument;

/// Extracts page text from PDF documents
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous extraction, for callers already on a blocking thread
    pub fn extract_blocking(data: Vec<u8>, cancel: &CancellationFlag) -> DocumentResult<String> {
        let doc = SafeDocument::from_bytes(data)?;
        tracing::debug!(pages = doc.page_count(), "Extracting PDF text");
        doc.extract_text(cancel)
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pdf
    }

    async fn extract(&self, data: Vec<u8>, cancel: CancellationFlag) -> DocumentResult<String> {
        // Offload to blocking task since MuPDF operations are CPU-bound
        tokio::task::spawn_blocking(move || Self::extract_blocking(data, &cancel))
            .await
            .map_err(|e| DocumentError::TaskFailed(format!("Task join error: {}", e)))?
    }
}
