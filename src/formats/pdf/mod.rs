//! PDF format implementation
//!
//! [`PdfTextExtractor`] implements `TextExtractor` for PDF documents using
//! MuPDF through [`SafeDocument`](crate::mupdf::SafeDocument).

mod extractor;

pub use extractor::PdfTextExtractor;
