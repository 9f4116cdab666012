//! Response content delivery
//!
//! A rendered diff leaves the service either as a raw PDF stream or as a
//! base64 [`EncodedPayload`] inside a JSON envelope.

mod encoder;
mod sink;

use serde::{Deserialize, Serialize};

pub use encoder::{EncodedPayload, OutputEncoder};
pub use sink::{ChannelWriter, Chunk, CHANNEL_CAPACITY, CHUNK_SIZE};

/// How the response carries the rendered PDF
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// JSON envelope with base64 payloads
    Json,
    /// `application/pdf` body written while it is produced
    Stream,
}
