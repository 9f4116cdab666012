//! Comparison Routes
//!
//! Endpoints:
//! - POST /compare - Diff two documents and render the result as PDF
//!
//! Accepted bodies:
//! - JSON array of files: `[{"$content-type": "...", "$content": "<base64>"}, ...]`
//! - JSON object: `{"files": [...], "options": {...}}`
//! - `multipart/form-data` with one file per field, in order
//!
//! Options may also be given in the query string. JSON bodies default to a
//! JSON envelope response, multipart bodies to a raw PDF stream.

use axum::{
    extract::{rejection::QueryRejection, DefaultBodyLimit, FromRequest, Multipart, Query, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use crate::cancel::CancellationFlag;
use crate::config::Config;
use crate::diff::Granularity;
use crate::document::DeclaredType;
use crate::error::{AppError, Result};
use crate::output::{EncodedPayload, OutputMode};
use crate::pipeline::{
    CompareOptions, ComparePipeline, ComparisonRequest, ComparisonStage, DocumentInput,
    REQUIRED_DOCUMENTS, TOO_FEW_FILES,
};
use crate::state::AppState;

/// Attachment name for streamed results
pub const RESULT_FILENAME: &str = "diff-result.pdf";

pub const SUCCESS_MESSAGE: &str = "Comparison completed";

/// Create the compare router
pub fn router(max_request_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", post(compare))
        .layer(DefaultBodyLimit::max(max_request_bytes))
}

/// A file entry as sent in JSON bodies
#[derive(Debug, Deserialize)]
pub struct FileEntry {
    #[serde(rename = "$content-type", default)]
    pub content_type: Option<String>,
    #[serde(rename = "$content")]
    pub content: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Option overrides from the query string or a tagged JSON body
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OptionOverrides {
    pub granularity: Option<Granularity>,
    pub include_unchanged: Option<bool>,
    pub leading_summary: Option<bool>,
    pub include_originals: Option<bool>,
    pub output: Option<OutputMode>,
}

impl OptionOverrides {
    /// Fields set in `other` win
    fn merge(self, other: OptionOverrides) -> Self {
        Self {
            granularity: other.granularity.or(self.granularity),
            include_unchanged: other.include_unchanged.or(self.include_unchanged),
            leading_summary: other.leading_summary.or(self.leading_summary),
            include_originals: other.include_originals.or(self.include_originals),
            output: other.output.or(self.output),
        }
    }

    fn resolve(self, config: &Config, default_output: OutputMode) -> (CompareOptions, OutputMode) {
        let defaults = CompareOptions::from_config(&config.diff);
        let options = CompareOptions {
            granularity: self.granularity.unwrap_or(defaults.granularity),
            include_unchanged: self.include_unchanged.unwrap_or(defaults.include_unchanged),
            leading_summary: self.leading_summary.unwrap_or(defaults.leading_summary),
            include_originals: self.include_originals.unwrap_or(defaults.include_originals),
        };
        (options, self.output.unwrap_or(default_output))
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CompareBody {
    Files(Vec<FileEntry>),
    Tagged {
        files: Vec<FileEntry>,
        #[serde(default)]
        options: OptionOverrides,
    },
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub status: bool,
    pub message: String,
    pub data: Vec<EncodedPayload>,
}

/// POST /compare
async fn compare(
    State(state): State<AppState>,
    query: std::result::Result<Query<OptionOverrides>, QueryRejection>,
    request: Request,
) -> Result<Response> {
    let Query(query) = query.map_err(|e| AppError::validation(e.body_text()))?;
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.to_ascii_lowercase().starts_with("multipart/form-data"));

    let (documents, overrides, default_output) = if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| rejection(e.status(), e.body_text()))?;
        (read_multipart(multipart).await?, query, OutputMode::Stream)
    } else {
        let Json(body) = Json::<CompareBody>::from_request(request, &state)
            .await
            .map_err(|e| rejection(e.status(), e.body_text()))?;
        let (files, body_options) = match body {
            CompareBody::Files(files) => (files, OptionOverrides::default()),
            CompareBody::Tagged { files, options } => (files, options),
        };
        (decode_entries(files)?, query.merge(body_options), OutputMode::Json)
    };

    let (options, output) = overrides.resolve(state.config(), default_output);
    tracing::debug!(
        "Comparing {} uploaded files with {:?}, output {:?}",
        documents.len(),
        options,
        output
    );

    // Dropping this handler (client disconnect) cancels blocking work
    let cancel = CancellationFlag::new();
    let guard = cancel.guard();
    let result = run_comparison(
        &state,
        cancel,
        ComparisonRequest { documents, options },
        output,
    )
    .await;
    guard.disarm();
    result
}

async fn run_comparison(
    state: &AppState,
    cancel: CancellationFlag,
    request: ComparisonRequest,
    output: OutputMode,
) -> Result<Response> {
    let outcome = ComparePipeline::from_state(state, cancel).run(request).await?;
    let encoder = *state.encoder();

    match output {
        OutputMode::Json => {
            let (mut tracker, payloads) = outcome.into_payloads(encoder).await?;
            tracker.advance(ComparisonStage::Responded);
            Ok(Json(CompareResponse {
                status: true,
                message: SUCCESS_MESSAGE.to_string(),
                data: payloads,
            })
            .into_response())
        }
        OutputMode::Stream => {
            let (mut tracker, body) = outcome.into_stream(encoder);
            tracker.advance(ComparisonStage::Responded);
            let headers = [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", RESULT_FILENAME),
                ),
            ];
            Ok((headers, body).into_response())
        }
    }
}

/// Map an extractor rejection, keeping the size limit distinct
fn rejection(status: StatusCode, message: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::Validation(message)
    }
}

/// Decode base64 JSON entries
///
/// The entry count is checked first so that a short request reports the
/// missing file rather than a decoding problem.
fn decode_entries(files: Vec<FileEntry>) -> Result<Vec<DocumentInput>> {
    if files.len() < REQUIRED_DOCUMENTS {
        return Err(AppError::validation(TOO_FEW_FILES));
    }

    files
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let data = BASE64.decode(entry.content.trim().as_bytes()).map_err(|e| {
                tracing::debug!("File {} has invalid base64 content: {}", index + 1, e);
                AppError::validation(format!("File {} is not valid base64.", index + 1))
            })?;
            let document =
                DocumentInput::new(data, DeclaredType::from_header(entry.content_type.as_deref()));
            Ok(match entry.name {
                Some(name) => document.with_name(name),
                None => document,
            })
        })
        .collect()
}

/// Collect every file part in order
async fn read_multipart(mut multipart: Multipart) -> Result<Vec<DocumentInput>> {
    let mut documents = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| rejection(e.status(), format!("Failed to read upload: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        let filename = field.file_name().map(|s| s.to_string());
        let content_type = field.content_type().map(|s| s.to_string());

        if filename.is_none() && content_type.is_none() {
            tracing::debug!("Ignoring non-file field '{}'", name);
            continue;
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| rejection(e.status(), format!("Failed to read file data: {}", e)))?;

        tracing::debug!(
            "Received field: name='{}', filename={:?}, content_type={:?}, {} bytes",
            name,
            filename,
            content_type,
            data.len()
        );

        let document =
            DocumentInput::new(data.to_vec(), DeclaredType::from_header(content_type.as_deref()));
        documents.push(match filename {
            Some(filename) => document.with_name(filename),
            None => document,
        });
    }

    Ok(documents)
}
