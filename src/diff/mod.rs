//! Text diffing
//!
//! Produces ordered, coalesced [`DiffSegment`] sequences between two plain
//! texts at line or word granularity. For any pair of inputs, the unchanged
//! and removed segments concatenate back to the original text and the
//! unchanged and added segments to the revised text.
//!
//! ```rust,ignore
//! use docdiff_server::diff::{line_diff, DiffSegment};
//!
//! let segments = line_diff("line1\nline2\nline3", "line1\nlineX\nline3");
//! assert_eq!(segments[1], DiffSegment::removed("line2\n"));
//! ```

mod engine;
mod tokenize;
mod types;

pub use engine::{line_diff, word_diff, DiffEngine, DiffError};
pub use tokenize::{split_lines, split_words};
pub use types::{
    reconstruct_original, reconstruct_revised, DiffSegment, DiffSummary, Granularity, SegmentKind,
};
