//! Document comparison pipeline
//!
//! One [`ComparePipeline`] run takes a [`ComparisonRequest`] through
//! validation, text extraction, diffing and rendering. The pipeline knows
//! nothing about HTTP: routes build the request and decide how the
//! [`ComparisonOutcome`] leaves the service.
//!
//! Every request walks the same stages and logs each transition with its
//! comparison id:
//!
//! ```text
//! Received -> Validated -> Extracted -> Diffed -> Rendered -> Encoded -> Responded
//!     \___________\____________\__________\__________\__________\---> Failed(kind)
//! ```

use std::fmt;

use axum::body::Body;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cancel::CancellationFlag;
use crate::config::DiffConfig;
use crate::diff::{DiffEngine, DiffSummary, Granularity};
use crate::document::{DeclaredType, DocumentFormat, MimeResolver};
use crate::error::{AppError, ErrorKind, Result};
use crate::formats::ExtractorRegistry;
use crate::output::{EncodedPayload, OutputEncoder};
use crate::render::{PageRenderer, RenderConfig, RenderError, RenderedDocument};
use crate::state::AppState;

/// Documents compared per request
pub const REQUIRED_DOCUMENTS: usize = 2;

pub const TOO_FEW_FILES: &str = "At least two files are required.";
pub const TOO_FEW_SUPPORTED: &str =
    "At least two files of a supported type (.docx or .pdf) are required.";
pub const TYPE_MISMATCH: &str = "Both files must be of the same supported type (.docx or .pdf).";

/// One uploaded document
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub data: Vec<u8>,
    pub declared: DeclaredType,
    pub name: Option<String>,
}

impl DocumentInput {
    pub fn new(data: Vec<u8>, declared: DeclaredType) -> Self {
        Self {
            data,
            declared,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn label(&self, index: usize) -> String {
        match &self.name {
            Some(name) => format!("{:?}", name),
            None => format!("#{}", index + 1),
        }
    }
}

/// Per-request comparison options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareOptions {
    pub granularity: Granularity,
    pub include_unchanged: bool,
    pub leading_summary: bool,
    /// Also render each extracted text on its own
    pub include_originals: bool,
}

impl CompareOptions {
    /// Options carrying the configured defaults
    pub fn from_config(config: &DiffConfig) -> Self {
        Self {
            granularity: Granularity::Line,
            include_unchanged: config.include_unchanged,
            leading_summary: config.leading_summary,
            include_originals: false,
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            include_unchanged: self.include_unchanged,
            leading_summary: self.leading_summary,
            granularity: self.granularity,
        }
    }
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            granularity: Granularity::Line,
            include_unchanged: true,
            leading_summary: false,
            include_originals: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ComparisonRequest {
    pub documents: Vec<DocumentInput>,
    pub options: CompareOptions,
}

/// Where a comparison currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonStage {
    Received,
    Validated,
    Extracted,
    Diffed,
    Rendered,
    Encoded,
    Responded,
    Failed(ErrorKind),
}

impl fmt::Display for ComparisonStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonStage::Received => f.write_str("received"),
            ComparisonStage::Validated => f.write_str("validated"),
            ComparisonStage::Extracted => f.write_str("extracted"),
            ComparisonStage::Diffed => f.write_str("diffed"),
            ComparisonStage::Rendered => f.write_str("rendered"),
            ComparisonStage::Encoded => f.write_str("encoded"),
            ComparisonStage::Responded => f.write_str("responded"),
            ComparisonStage::Failed(kind) => write!(f, "failed({})", kind),
        }
    }
}

/// Records and logs stage transitions of one comparison
#[derive(Debug)]
pub struct StageTracker {
    id: Uuid,
    stage: ComparisonStage,
}

impl StageTracker {
    pub fn new(id: Uuid) -> Self {
        debug!(comparison_id = %id, "Comparison received");
        Self {
            id,
            stage: ComparisonStage::Received,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn stage(&self) -> ComparisonStage {
        self.stage
    }

    pub fn advance(&mut self, next: ComparisonStage) {
        debug!(
            comparison_id = %self.id,
            "Comparison {} -> {}",
            self.stage,
            next
        );
        self.stage = next;
    }

    pub fn fail(&mut self, err: &AppError) {
        self.advance(ComparisonStage::Failed(err.kind()));
    }
}

/// Result of a successful pipeline run, not yet encoded
#[derive(Debug)]
pub struct ComparisonOutcome {
    pub tracker: StageTracker,
    pub format: DocumentFormat,
    pub summary: DiffSummary,
    pub diff: RenderedDocument,
    /// Renders of the first and second document's text
    pub originals: Option<[RenderedDocument; 2]>,
    cancel: CancellationFlag,
}

impl ComparisonOutcome {
    /// Encode every rendered document as a base64 payload
    ///
    /// Originals come first when present, the diff last. All-or-nothing: a
    /// failure yields no payloads.
    pub async fn into_payloads(
        self,
        encoder: OutputEncoder,
    ) -> Result<(StageTracker, Vec<EncodedPayload>)> {
        let ComparisonOutcome {
            mut tracker,
            diff,
            originals,
            cancel,
            ..
        } = self;

        let encoded = tokio::task::spawn_blocking(move || {
            let mut documents: Vec<RenderedDocument> = originals.map(Vec::from).unwrap_or_default();
            documents.push(diff);
            documents
                .iter()
                .map(|document| {
                    if cancel.is_cancelled() {
                        return Err(RenderError::Cancelled);
                    }
                    encoder.encode_buffered(document)
                })
                .collect::<std::result::Result<Vec<_>, RenderError>>()
        })
        .await;

        match encoded.map_err(AppError::from).and_then(|r| r.map_err(AppError::from)) {
            Ok(payloads) => {
                tracker.advance(ComparisonStage::Encoded);
                Ok((tracker, payloads))
            }
            Err(e) => {
                tracker.fail(&e);
                Err(e)
            }
        }
    }

    /// Stream the diff render as a raw PDF body
    pub fn into_stream(self, encoder: OutputEncoder) -> (StageTracker, Body) {
        let mut tracker = self.tracker;
        if self.originals.is_some() {
            debug!(
                comparison_id = %tracker.id(),
                "Original renders are only returned in JSON responses"
            );
        }
        let body = encoder.stream(self.diff, self.cancel);
        tracker.advance(ComparisonStage::Encoded);
        (tracker, body)
    }
}

/// Runs one comparison
pub struct ComparePipeline<'a> {
    resolver: &'a MimeResolver,
    extractors: &'a ExtractorRegistry,
    cancel: CancellationFlag,
}

impl<'a> ComparePipeline<'a> {
    pub fn new(
        resolver: &'a MimeResolver,
        extractors: &'a ExtractorRegistry,
        cancel: CancellationFlag,
    ) -> Self {
        Self {
            resolver,
            extractors,
            cancel,
        }
    }

    pub fn from_state(state: &'a AppState, cancel: CancellationFlag) -> Self {
        Self::new(state.resolver(), state.extractors(), cancel)
    }

    /// Pick the two documents to compare
    ///
    /// Entries that do not resolve to a supported format are skipped; the
    /// first two that do must share a format.
    pub fn validate(
        &self,
        documents: Vec<DocumentInput>,
    ) -> Result<(DocumentInput, DocumentInput, DocumentFormat)> {
        if documents.len() < REQUIRED_DOCUMENTS {
            return Err(AppError::validation(TOO_FEW_FILES));
        }

        let mut usable = documents
            .into_iter()
            .enumerate()
            .filter_map(|(index, document)| {
                let resolved = self.resolver.resolve(&document.data, &document.declared);
                if self.resolver.validate(resolved) {
                    resolved.map(|format| (document, format))
                } else {
                    debug!(
                        "Skipping document {} ({:?}): unsupported type",
                        document.label(index),
                        document.declared
                    );
                    None
                }
            });

        let (Some((first, first_format)), Some((second, second_format))) =
            (usable.next(), usable.next())
        else {
            return Err(AppError::validation(TOO_FEW_SUPPORTED));
        };

        if first_format != second_format {
            debug!(
                "Type mismatch: {} vs {}",
                first_format.label(),
                second_format.label()
            );
            return Err(AppError::validation(TYPE_MISMATCH));
        }

        Ok((first, second, first_format))
    }

    /// Validate, extract, diff and render
    pub async fn run(&self, request: ComparisonRequest) -> Result<ComparisonOutcome> {
        let mut tracker = StageTracker::new(Uuid::new_v4());

        match self.execute(request, &mut tracker).await {
            Ok((format, summary, diff, originals)) => Ok(ComparisonOutcome {
                tracker,
                format,
                summary,
                diff,
                originals,
                cancel: self.cancel.clone(),
            }),
            Err(e) => {
                tracker.fail(&e);
                Err(e)
            }
        }
    }

    #[allow(clippy::type_complexity)]
    async fn execute(
        &self,
        request: ComparisonRequest,
        tracker: &mut StageTracker,
    ) -> Result<(
        DocumentFormat,
        DiffSummary,
        RenderedDocument,
        Option<[RenderedDocument; 2]>,
    )> {
        let ComparisonRequest { documents, options } = request;

        let (first, second, format) = self.validate(documents)?;
        tracker.advance(ComparisonStage::Validated);

        let extractor = self.extractors.get(format);
        let (text_a, text_b) = tokio::try_join!(
            extractor.extract(first.data, self.cancel.clone()),
            extractor.extract(second.data, self.cancel.clone()),
        )?;
        debug!(
            comparison_id = %tracker.id(),
            "Extracted {} and {} chars of {} text",
            text_a.len(),
            text_b.len(),
            format.label()
        );
        tracker.advance(ComparisonStage::Extracted);

        let engine = DiffEngine::new(self.cancel.clone());
        let granularity = options.granularity;
        let (segments, text_a, text_b) = tokio::task::spawn_blocking(move || {
            engine
                .diff(granularity, &text_a, &text_b)
                .map(|segments| (segments, text_a, text_b))
        })
        .await??;

        let summary = DiffSummary::from_segments(&segments);
        info!(
            comparison_id = %tracker.id(),
            "Compared {} documents: {} added, {} removed, {} unchanged chars",
            format.label(),
            summary.added_chars,
            summary.removed_chars,
            summary.unchanged_chars
        );
        if summary.is_identical() {
            info!(comparison_id = %tracker.id(), "Documents have identical text");
        }
        tracker.advance(ComparisonStage::Diffed);

        let renderer = PageRenderer::new(options.render_config()).with_cancellation(self.cancel.clone());
        let include_originals = options.include_originals;
        let (diff, originals) = tokio::task::spawn_blocking(move || {
            let diff = renderer.render(&segments)?;
            let originals = if include_originals {
                Some([renderer.render_plain(&text_a)?, renderer.render_plain(&text_b)?])
            } else {
                None
            };
            Ok::<_, RenderError>((diff, originals))
        })
        .await??;
        tracker.advance(ComparisonStage::Rendered);

        Ok((format, summary, diff, originals))
    }
}
