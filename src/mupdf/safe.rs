//! Thread-safe document wrapper for MuPDF
//!
//! MuPDF documents are not thread-safe. This wrapper:
//!
//! 1. Owns the document bytes
//! 2. Opens a fresh document for each operation
//! 3. Uses `parking_lot::Mutex` to serialize operations on a shared handle
//!
//! No `mupdf::Document` outlives the closure it was opened for, so the
//! wrapper holds only plain data and is `Send + Sync` without any unsafe
//! impls.

use std::sync::Arc;

use mupdf::{Document, TextPageOptions};
use parking_lot::Mutex;

use crate::cancel::CancellationFlag;
use crate::document::{DocumentError, DocumentFormat, DocumentResult, PDF_MIME};

/// Thread-safe PDF document handle
pub struct SafeDocument {
    /// Document bytes
    data: Arc<Vec<u8>>,
    /// Page count, read once when the document is validated
    page_count: usize,
    /// Mutex for serializing access
    _lock: Mutex<()>,
}

impl SafeDocument {
    /// Open and validate a PDF from bytes
    pub fn from_bytes(data: Vec<u8>) -> DocumentResult<Self> {
        let doc = Document::from_bytes(&data, PDF_MIME).map_err(|e| DocumentError::Open {
            format: DocumentFormat::Pdf,
            message: e.to_string(),
        })?;
        let page_count = doc.page_count()?;
        let page_count = usize::try_from(page_count)
            .map_err(|_| DocumentError::InvalidContent(format!("Invalid page count {}", page_count)))?;

        Ok(Self {
            data: Arc::new(data),
            page_count,
            _lock: Mutex::new(()),
        })
    }

    /// Number of pages
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Execute a closure with access to a freshly opened document
    ///
    /// # Example
    ///
    /// ```ignore
    /// let bounds = safe_doc.with_doc(|doc| {
    ///     let page = doc.load_page(0)?;
    ///     Ok(page.bounds()?)
    /// })?;
    /// ```
    pub fn with_doc<F, R>(&self, f: F) -> DocumentResult<R>
    where
        F: FnOnce(&Document) -> DocumentResult<R>,
    {
        let _guard = self._lock.lock();
        let doc = Document::from_bytes(&self.data, PDF_MIME)?;
        f(&doc)
    }

    /// Extract the plain text of every page, in order
    ///
    /// The cancellation flag is checked before each page.
    pub fn extract_text(&self, cancel: &CancellationFlag) -> DocumentResult<String> {
        let page_count = self.page_count;
        self.with_doc(|doc| {
            let mut text = String::new();
            for index in 0..page_count {
                if cancel.is_cancelled() {
                    return Err(DocumentError::Cancelled);
                }

                let page = doc.load_page(index as i32)?;
                let text_page = page.to_text_page(TextPageOptions::empty())?;
                text.push_str(&text_page.to_text()?);
            }
            Ok(text)
        })
    }
}
