//! Low-level MuPDF wrapper
//!
//! MuPDF's `fz_context` is **NOT thread-safe**. [`SafeDocument`] keeps only
//! the document bytes and opens a fresh MuPDF document under a mutex for each
//! operation.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::mupdf::SafeDocument;
//!
//! let doc = SafeDocument::from_bytes(pdf_bytes)?;
//! let text = doc.extract_text(&CancellationFlag::new())?;
//! ```

mod safe;

pub use safe::SafeDocument;
