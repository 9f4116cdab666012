//! DOCX format implementation
//!
//! [`DocxTextExtractor`] implements `TextExtractor` for Office Open XML
//! word-processing packages using `zip` and `quick-xml`.

mod extractor;

pub use extractor::DocxTextExtractor;

#[cfg(test)]
pub(crate) use extractor::tests::build_docx;
