//! Error types for the docdiff server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::diff::DiffError;
use crate::document::DocumentError;
use crate::render::RenderError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Message returned for every server-side failure
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Request rejected before any document was processed
    #[error("{0}")]
    Validation(String),

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Extraction failed: {0}")]
    Extraction(DocumentError),

    #[error("Rendering failed: {0}")]
    Render(RenderError),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse error category, used in logs and the request state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Extraction,
    Render,
    Cancelled,
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Extraction => "extraction",
            ErrorKind::Render => "render",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Internal => "internal",
        };
        f.write_str(name)
    }
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) | AppError::PayloadTooLarge => ErrorKind::Validation,
            AppError::Extraction(_) => ErrorKind::Extraction,
            AppError::Render(_) => ErrorKind::Render,
            AppError::Cancelled => ErrorKind::Cancelled,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Cancelled => AppError::Cancelled,
            other => AppError::Extraction(other),
        }
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Cancelled => AppError::Cancelled,
            other => AppError::Render(other),
        }
    }
}

impl From<DiffError> for AppError {
    fn from(err: DiffError) -> Self {
        match err {
            DiffError::Cancelled => AppError::Cancelled,
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Task join error: {}", err))
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    status: bool,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Validation(msg) => msg.clone(),
            AppError::PayloadTooLarge => "Request too large.".to_string(),
            AppError::Cancelled => {
                tracing::debug!("Comparison cancelled by client");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            other => {
                tracing::error!("{}", other);
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        let body = Json(ErrorResponse {
            status: false,
            message,
        });

        (self.status_code(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::validation("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(DocumentError::ParseError("x".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_cancellation_collapses_across_layers() {
        assert_eq!(AppError::from(DocumentError::Cancelled).kind(), ErrorKind::Cancelled);
        assert_eq!(AppError::from(RenderError::Cancelled).kind(), ErrorKind::Cancelled);
        assert_eq!(AppError::from(DiffError::Cancelled).kind(), ErrorKind::Cancelled);
        assert_eq!(
            AppError::from(RenderError::unsupported('\u{4E00}')).kind(),
            ErrorKind::Render
        );
    }

    #[tokio::test]
    async fn test_server_errors_hide_detail() {
        let response =
            AppError::from(DocumentError::MissingPart("word/document.xml".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], false);
        assert_eq!(json["message"], INTERNAL_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_validation_message_is_returned() {
        let response = AppError::validation("At least two files are required.").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], false);
        assert_eq!(json["message"], "At least two files are required.");
    }
}
