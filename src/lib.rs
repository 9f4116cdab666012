//! docdiff server library
//!
//! Compares two PDF or DOCX documents and renders the differences as an
//! annotated PDF. The HTTP binary is in main.rs; everything it needs is
//! exposed here for integration tests and benchmarks.
//!
//! # Modules
//!
//! - `document`: Format detection and the text extraction contract
//! - `formats`: PDF (MuPDF) and DOCX (OOXML) extractors
//! - `diff`: Line and word diffing
//! - `render`: Paginated layout and PDF serialization
//! - `output`: Buffered and streamed delivery
//! - `pipeline`: One comparison from request to rendered document
//! - `routes`: HTTP endpoints

pub mod cancel;
pub mod config;
pub mod diff;
pub mod document;
pub mod error;
pub mod formats;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod routes;
pub mod state;

// MuPDF wrapper used by the PDF extractor
mod mupdf;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application with tracing and CORS middleware
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_request_bytes = state.config().limits.max_request_bytes;

    routes::router(max_request_bytes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
