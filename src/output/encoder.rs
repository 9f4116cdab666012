//! Buffered and streamed delivery of rendered documents

use axum::body::Body;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::sink::{ChannelWriter, Chunk, CHANNEL_CAPACITY};
use crate::cancel::CancellationFlag;
use crate::document::PDF_MIME;
use crate::render::{PdfWriter, RenderError, RenderedDocument};

/// Self-describing file payload, the same shape clients upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedPayload {
    #[serde(rename = "$content-type")]
    pub content_type: String,
    /// Base64 (standard alphabet, padded)
    #[serde(rename = "$content")]
    pub content: String,
}

impl EncodedPayload {
    pub fn new(content_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            content_type: content_type.into(),
            content: BASE64.encode(bytes),
        }
    }

    pub fn pdf(bytes: &[u8]) -> Self {
        Self::new(PDF_MIME, bytes)
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(self.content.as_bytes())
    }
}

/// Turns rendered documents into response content
///
/// Both delivery modes run the same [`PdfWriter`] over the same document, so
/// a streamed body and a decoded payload are byte-for-byte identical.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputEncoder {
    writer: PdfWriter,
}

impl OutputEncoder {
    /// Serialize fully into memory
    pub fn to_bytes(&self, document: &RenderedDocument) -> Result<Vec<u8>, RenderError> {
        self.writer.to_bytes(document)
    }

    /// Serialize into a base64 payload
    pub fn encode_buffered(&self, document: &RenderedDocument) -> Result<EncodedPayload, RenderError> {
        let bytes = self.to_bytes(document)?;
        tracing::debug!("Encoded {} PDF bytes into payload", bytes.len());
        Ok(EncodedPayload::pdf(&bytes))
    }

    /// Serialize on the blocking pool straight into a response body
    ///
    /// Must be called from within a tokio runtime. The body ends with an
    /// error if serialization fails part way; a client that stops reading
    /// stops the writer at its next chunk.
    pub fn stream(&self, document: RenderedDocument, cancel: CancellationFlag) -> Body {
        let (tx, rx) = mpsc::channel::<Chunk>(CHANNEL_CAPACITY);
        let writer = self.writer;

        tokio::task::spawn_blocking(move || {
            let mut sink = ChannelWriter::new(tx);
            if cancel.is_cancelled() {
                tracing::debug!("Request cancelled before streaming started");
                return;
            }

            let result = writer
                .write_to(&document, &mut sink)
                .and_then(|()| sink.finish().map_err(RenderError::from));

            match result {
                Ok(()) => tracing::debug!("Streamed {} PDF bytes", sink.bytes_sent()),
                Err(_) if sink.is_closed() => {
                    tracing::debug!(
                        "Client stopped reading after {} bytes",
                        sink.bytes_sent()
                    );
                }
                Err(e) => {
                    tracing::error!("PDF streaming failed: {}", e);
                    sink.fail(e.to_string());
                }
            }
        });

        let chunks = futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|chunk| (chunk, rx))
        });
        Body::from_stream(chunks)
    }
}
