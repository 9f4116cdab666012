//! Document abstraction
//!
//! Format classification and the extraction contract shared by every
//! supported document format.
//!
//! # Architecture
//!
//! ```text
//!   bytes + declared type
//!            │
//!            ▼
//!   ┌──────────────────┐
//!   │   MimeResolver   │  trusts explicit MIME, sniffs the generic sentinel
//!   └──────────────────┘
//!            │ DocumentFormat (Pdf | Docx)
//!            ▼
//!   ┌──────────────────┐
//!   │  TextExtractor   │  one implementation per format (see `formats`)
//!   └──────────────────┘
//!            │
//!            ▼
//!       plain text
//! ```

mod error;
mod mime;
mod traits;
mod types;

pub use error::{DocumentError, DocumentResult, Result};
pub use mime::MimeResolver;
pub use traits::TextExtractor;
pub use types::{DeclaredType, DocumentFormat, DOCX_MIME, OCTET_STREAM_MIME, PDF_MIME};
