//! Rendered document model

use crate::diff::{Granularity, SegmentKind};

/// RGB color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    /// `#008000`
    pub const GREEN: Color = Color {
        r: 0.0,
        g: 128.0 / 255.0,
        b: 0.0,
    };
    /// `#FF0000`
    pub const RED: Color = Color {
        r: 1.0,
        g: 0.0,
        b: 0.0,
    };

    /// Color used for a segment kind
    pub fn for_kind(kind: SegmentKind) -> Self {
        match kind {
            SegmentKind::Unchanged => Self::BLACK,
            SegmentKind::Added => Self::GREEN,
            SegmentKind::Removed => Self::RED,
        }
    }
}

/// Horizontal line drawn through removed text, in top-left page coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeLine {
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
}

/// One line of uniformly styled text placed on a page
///
/// Coordinates are in points with the origin at the top-left corner of the
/// page; `y` is the top of the run's line box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub line_height: f32,
    pub font_size: f32,
    pub color: Color,
    pub kind: Option<SegmentKind>,
    pub strike: Option<StrikeLine>,
}

impl TextRun {
    /// Bottom edge of the line box
    pub fn bottom(&self) -> f32 {
        self.y + self.line_height
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub runs: Vec<TextRun>,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Page size, margins and base font size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub font_size: f32,
}

impl PageGeometry {
    /// US Letter, one inch margins, 12pt text
    pub const LETTER: PageGeometry = PageGeometry {
        width: 612.0,
        height: 792.0,
        margin: 72.0,
        font_size: 12.0,
    };

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Lowest y a line box may reach
    pub fn content_bottom(&self) -> f32 {
        self.height - self.margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::LETTER
    }
}

/// Output of the page renderer: pages in order, never empty
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
}

impl RenderedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.pages.iter().flat_map(|page| page.runs.iter())
    }
}

/// Options controlling how a segment sequence is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    pub include_unchanged: bool,
    pub leading_summary: bool,
    pub granularity: Granularity,
}

impl RenderConfig {
    /// Introductory line printed when `leading_summary` is set
    pub fn summary_line(&self) -> &'static str {
        if !self.include_unchanged {
            return "Changes between files:";
        }
        match self.granularity {
            Granularity::Line => "Line-by-line differences:",
            Granularity::Word => "Word-by-word differences:",
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            include_unchanged: true,
            leading_summary: false,
            granularity: Granularity::Line,
        }
    }
}
