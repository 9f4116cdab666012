//! Diff data types

use serde::Deserialize;

/// Classification of a diff segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Unchanged,
    Added,
    Removed,
}

/// A maximal run of text sharing one classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSegment {
    pub kind: SegmentKind,
    pub text: String,
}

impl DiffSegment {
    pub fn new(kind: SegmentKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn unchanged(text: impl Into<String>) -> Self {
        Self::new(SegmentKind::Unchanged, text)
    }

    pub fn added(text: impl Into<String>) -> Self {
        Self::new(SegmentKind::Added, text)
    }

    pub fn removed(text: impl Into<String>) -> Self {
        Self::new(SegmentKind::Removed, text)
    }

    /// Whether this segment belongs to the original text
    pub fn in_original(&self) -> bool {
        matches!(self.kind, SegmentKind::Unchanged | SegmentKind::Removed)
    }

    /// Whether this segment belongs to the revised text
    pub fn in_revised(&self) -> bool {
        matches!(self.kind, SegmentKind::Unchanged | SegmentKind::Added)
    }
}

/// Unit the diff is computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Lines, terminator included
    #[default]
    Line,
    /// Words, trailing whitespace included
    Word,
}

/// Aggregate counts over a segment sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub unchanged_segments: usize,
    pub added_segments: usize,
    pub removed_segments: usize,
    pub unchanged_chars: usize,
    pub added_chars: usize,
    pub removed_chars: usize,
}

impl DiffSummary {
    pub fn from_segments(segments: &[DiffSegment]) -> Self {
        let mut summary = Self::default();
        for segment in segments {
            let chars = segment.text.chars().count();
            match segment.kind {
                SegmentKind::Unchanged => {
                    summary.unchanged_segments += 1;
                    summary.unchanged_chars += chars;
                }
                SegmentKind::Added => {
                    summary.added_segments += 1;
                    summary.added_chars += chars;
                }
                SegmentKind::Removed => {
                    summary.removed_segments += 1;
                    summary.removed_chars += chars;
                }
            }
        }
        summary
    }

    /// Whether the two texts were identical
    pub fn is_identical(&self) -> bool {
        self.added_segments == 0 && self.removed_segments == 0
    }
}

/// Rebuild the original text from a segment sequence
pub fn reconstruct_original(segments: &[DiffSegment]) -> String {
    segments
        .iter()
        .filter(|s| s.in_original())
        .map(|s| s.text.as_str())
        .collect()
}

/// Rebuild the revised text from a segment sequence
pub fn reconstruct_revised(segments: &[DiffSegment]) -> String {
    segments
        .iter()
        .filter(|s| s.in_revised())
        .map(|s| s.text.as_str())
        .collect()
}
