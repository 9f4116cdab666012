//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::document::MimeResolver;
use crate::formats::ExtractorRegistry;
use crate::output::OutputEncoder;

/// Shared application state
///
/// Immutable after startup; every request gets its own pipeline.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    resolver: MimeResolver,
    extractors: ExtractorRegistry,
    encoder: OutputEncoder,
}

impl AppState {
    /// Create state with the built-in PDF and DOCX extractors
    pub fn new(config: Config) -> Self {
        Self::with_extractors(config, ExtractorRegistry::default())
    }

    /// Create state with explicit extractors
    pub fn with_extractors(config: Config, extractors: ExtractorRegistry) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                resolver: MimeResolver::new(),
                extractors,
                encoder: OutputEncoder::default(),
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn resolver(&self) -> &MimeResolver {
        &self.inner.resolver
    }

    /// Get the extractor registry
    pub fn extractors(&self) -> &ExtractorRegistry {
        &self.inner.extractors
    }

    pub fn encoder(&self) -> &OutputEncoder {
        &self.inner.encoder
    }
}
