//! Format-specific text extractors
//!
//! Each supported [`DocumentFormat`] has exactly one [`TextExtractor`]. The
//! [`ExtractorRegistry`] is built once at startup and looked up with an
//! exhaustive match, so adding a format without an extractor fails to compile.

pub mod docx;
pub mod pdf;

use std::sync::Arc;

use crate::document::{DocumentFormat, TextExtractor};

pub use docx::DocxTextExtractor;
pub use pdf::PdfTextExtractor;

/// Extractor per supported format
#[derive(Clone)]
pub struct ExtractorRegistry {
    pdf: Arc<dyn TextExtractor>,
    docx: Arc<dyn TextExtractor>,
}

impl ExtractorRegistry {
    /// Build a registry from explicit extractors
    pub fn new(pdf: Arc<dyn TextExtractor>, docx: Arc<dyn TextExtractor>) -> Self {
        Self { pdf, docx }
    }

    /// Extractor for a resolved format
    pub fn get(&self, format: DocumentFormat) -> Arc<dyn TextExtractor> {
        match format {
            DocumentFormat::Pdf => Arc::clone(&self.pdf),
            DocumentFormat::Docx => Arc::clone(&self.docx),
        }
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new(Arc::new(PdfTextExtractor::new()), Arc::new(DocxTextExtractor::new()))
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("pdf", &self.pdf.format())
            .field("docx", &self.docx.format())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_covers_every_format() {
        let registry = ExtractorRegistry::default();
        for format in DocumentFormat::ALL {
            assert_eq!(registry.get(format).format(), format);
        }
    }
}
