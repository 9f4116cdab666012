//! Annotated PDF rendering
//!
//! [`PageRenderer`] turns a diff into a paginated [`RenderedDocument`]:
//! additions in green, removals in red with a strike line, unchanged context
//! in black. [`PdfWriter`] serializes that document with the standard
//! Times-Roman face, so no font data is embedded.

mod error;
mod layout;
mod metrics;
mod pdf;
mod types;

pub use error::RenderError;
pub use layout::{PageRenderer, EMPTY_DOCUMENT_TEXT};
pub use metrics::{normalize, FontMetrics};
pub use pdf::PdfWriter;
pub use types::{Color, Page, PageGeometry, RenderConfig, RenderedDocument, StrikeLine, TextRun};
