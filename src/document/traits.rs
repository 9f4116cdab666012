//! Document traits
//!
//! Format-specific extraction plugs into the comparison pipeline through
//! [`TextExtractor`].

use async_trait::async_trait;

use super::error::Result;
use super::types::DocumentFormat;
use crate::cancel::CancellationFlag;

/// Converts raw document bytes into plain text
///
/// Implementations are stateless and shared across requests. CPU-bound work
/// belongs on the blocking pool, and long-running loops should poll the
/// cancellation flag.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Format this extractor understands
    fn format(&self) -> DocumentFormat;

    /// Extract plain text from a document
    async fn extract(&self, data: Vec<u8>, cancel: CancellationFlag) -> Result<String>;
}
