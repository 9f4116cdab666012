//! Rendering error types

use thiserror::Error;

/// Errors raised while laying out or serializing a rendered document
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Cannot render character {character:?} (U+{code:04X})")]
    UnsupportedCharacter { character: char, code: u32 },

    #[error("PDF encoding failed: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rendering cancelled")]
    Cancelled,
}

impl RenderError {
    pub fn unsupported(character: char) -> Self {
        Self::UnsupportedCharacter {
            character,
            code: character as u32,
        }
    }
}

impl From<lopdf::Error> for RenderError {
    fn from(err: lopdf::Error) -> Self {
        RenderError::Encode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
