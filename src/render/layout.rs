//! Paginated layout of diff segments
//!
//! Every segment starts on a fresh line at the left margin. Lines are wrapped
//! greedily at spaces; a word wider than the content box is broken between
//! characters. A line box never crosses the bottom margin: when the next line
//! does not fit, layout continues at the top of a new page.

use tracing::debug;

use super::error::{RenderError, Result};
use super::metrics::{normalize, FontMetrics};
use super::types::{Color, Page, PageGeometry, RenderConfig, RenderedDocument, StrikeLine, TextRun};
use crate::cancel::CancellationFlag;
use crate::diff::{DiffSegment, SegmentKind};

/// Text rendered for an original document with no extractable text
pub const EMPTY_DOCUMENT_TEXT: &str = "No content available";

/// Lays out segment sequences onto pages
#[derive(Debug, Clone)]
pub struct PageRenderer {
    config: RenderConfig,
    geometry: PageGeometry,
    metrics: FontMetrics,
    cancel: CancellationFlag,
}

impl PageRenderer {
    pub fn new(config: RenderConfig) -> Self {
        let geometry = PageGeometry::default();
        Self {
            config,
            geometry,
            metrics: FontMetrics::times_roman(geometry.font_size),
            cancel: CancellationFlag::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    /// Lay out a diff
    ///
    /// Unchanged segments are dropped unless `include_unchanged` is set.
    /// Segments that are blank after trimming produce nothing.
    pub fn render(&self, segments: &[DiffSegment]) -> Result<RenderedDocument> {
        let mut cursor = Cursor::new(self.geometry, self.metrics, &self.cancel);

        if self.config.leading_summary {
            cursor.paragraph(self.config.summary_line(), Color::BLACK, None)?;
            cursor.blank_line();
        }

        for segment in segments {
            cursor.check_cancelled()?;

            if segment.kind == SegmentKind::Unchanged && !self.config.include_unchanged {
                continue;
            }

            let text = normalize(&segment.text);
            let text = text.trim();
            if text.is_empty() {
                continue;
            }

            cursor.paragraph(text, Color::for_kind(segment.kind), Some(segment.kind))?;
        }

        let document = cursor.finish();
        debug!(
            "Laid out {} segments on {} pages",
            segments.len(),
            document.page_count()
        );
        Ok(document)
    }

    /// Lay out plain text in the default color
    pub fn render_plain(&self, text: &str) -> Result<RenderedDocument> {
        let mut cursor = Cursor::new(self.geometry, self.metrics, &self.cancel);

        let text = normalize(text);
        let text = match text.trim() {
            "" => EMPTY_DOCUMENT_TEXT,
            trimmed => trimmed,
        };
        cursor.paragraph(text, Color::BLACK, None)?;

        Ok(cursor.finish())
    }
}

struct Cursor<'a> {
    geometry: PageGeometry,
    metrics: FontMetrics,
    cancel: &'a CancellationFlag,
    pages: Vec<Page>,
    current: Page,
    y: f32,
}

impl<'a> Cursor<'a> {
    fn new(geometry: PageGeometry, metrics: FontMetrics, cancel: &'a CancellationFlag) -> Self {
        Self {
            geometry,
            metrics,
            cancel,
            pages: Vec::new(),
            current: Page::default(),
            y: geometry.margin,
        }
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(RenderError::Cancelled);
        }
        Ok(())
    }

    /// Place normalized text starting on a new line
    fn paragraph(&mut self, text: &str, color: Color, kind: Option<SegmentKind>) -> Result<()> {
        for line in text.split('\n') {
            self.check_cancelled()?;

            if line.trim().is_empty() {
                self.blank_line();
                continue;
            }

            for wrapped in self.wrap(line)? {
                self.place(wrapped, color, kind)?;
            }
        }
        Ok(())
    }

    fn blank_line(&mut self) {
        self.make_room();
        self.y += self.metrics.line_height();
    }

    fn place(&mut self, text: String, color: Color, kind: Option<SegmentKind>) -> Result<()> {
        self.make_room();

        let line_height = self.metrics.line_height();
        let x = self.geometry.margin;
        let y = self.y;
        let width = self.metrics.measure(&text)?;
        let strike = (kind == Some(SegmentKind::Removed)).then(|| StrikeLine {
            x1: x,
            x2: x + width,
            y: y + line_height / 2.0,
        });

        self.current.runs.push(TextRun {
            text,
            x,
            y,
            width,
            line_height,
            font_size: self.metrics.size(),
            color,
            kind,
            strike,
        });
        self.y += line_height;
        Ok(())
    }

    /// Start a new page if the next line box would cross the bottom margin
    fn make_room(&mut self) {
        let at_top = self.y <= self.geometry.margin;
        if !at_top && self.y + self.metrics.line_height() > self.geometry.content_bottom() {
            self.pages.push(std::mem::take(&mut self.current));
            self.y = self.geometry.margin;
        }
    }

    /// Break one source line into lines that fit the content width
    fn wrap(&self, line: &str) -> Result<Vec<String>> {
        let max = self.metrics.to_units(self.geometry.content_width());
        let mut wrapped = LineBuffer::default();

        for word in line.split_inclusive(' ') {
            let body = word.trim_end_matches(' ');
            let body_units = self.metrics.units(body)?;
            let space_units = self.metrics.units(&word[body.len()..])?;

            if !body.is_empty() && wrapped.units + body_units > max {
                if wrapped.has_text() {
                    wrapped.break_line();
                } else {
                    // indentation alone would push the word off the line
                    wrapped.clear();
                }
            }

            if body_units > max {
                for ch in body.chars() {
                    let mut buf = [0u8; 4];
                    let glyph = ch.encode_utf8(&mut buf);
                    let units = self.metrics.units(glyph)?;
                    if wrapped.has_text() && wrapped.units + units > max {
                        wrapped.break_line();
                    }
                    wrapped.push(glyph, units);
                }
                wrapped.push(&word[body.len()..], space_units);
            } else {
                wrapped.push(word, body_units + space_units);
            }
        }

        Ok(wrapped.finish())
    }

    fn finish(mut self) -> RenderedDocument {
        self.pages.push(self.current);
        RenderedDocument {
            geometry: self.geometry,
            pages: self.pages,
        }
    }
}

#[derive(Default)]
struct LineBuffer {
    lines: Vec<String>,
    current: String,
    units: u32,
}

impl LineBuffer {
    fn has_text(&self) -> bool {
        !self.current.trim().is_empty()
    }

    fn push(&mut self, text: &str, units: u32) {
        self.current.push_str(text);
        self.units += units;
    }

    fn clear(&mut self) {
        self.current.clear();
        self.units = 0;
    }

    fn break_line(&mut self) {
        let line = std::mem::take(&mut self.current);
        let line = line.trim_end();
        if !line.is_empty() {
            self.lines.push(line.to_string());
        }
        self.units = 0;
    }

    fn finish(mut self) -> Vec<String> {
        self.break_line();
        self.lines
    }
}
