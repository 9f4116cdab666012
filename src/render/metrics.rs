//! Font metrics for the standard Times-Roman face
//!
//! Widths come from the Adobe Core 14 AFM for Times-Roman, indexed by
//! `WinAnsiEncoding` code. Text is normalized first so that common
//! extraction artifacts (ligatures, exotic spaces, zero-width marks) map
//! onto glyphs the font actually has.

use super::error::{RenderError, Result};

/// PostScript name of the only face the renderer uses
pub const FONT_NAME: &str = "Times-Roman";

/// Font encoding written into the PDF font dictionary
pub const FONT_ENCODING: &str = "WinAnsiEncoding";

const UNITS_PER_EM: f32 = 1000.0;
const BBOX_TOP: f32 = 898.0;
const BBOX_BOTTOM: f32 = -218.0;

const TAB: &str = "    ";

/// Advance widths for codes 0x20..=0xFF; 0 marks an unassigned code
#[rustfmt::skip]
const WIDTHS: [u16; 224] = [
    // 0x20
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    // 0x30
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    // 0x40
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    // 0x50
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    // 0x60
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    // 0x70
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541, 0,
    // 0x80
    500, 0, 333, 500, 444, 1000, 500, 500, 333, 1000, 556, 333, 889, 0, 611, 0,
    // 0x90
    0, 333, 333, 444, 444, 350, 500, 1000, 333, 980, 389, 333, 722, 0, 444, 722,
    // 0xA0
    250, 333, 500, 500, 500, 500, 200, 500, 333, 760, 276, 500, 564, 333, 760, 333,
    // 0xB0
    400, 564, 300, 300, 333, 500, 453, 250, 333, 300, 310, 500, 750, 750, 750, 444,
    // 0xC0
    722, 722, 722, 722, 722, 722, 889, 667, 611, 611, 611, 611, 333, 333, 333, 333,
    // 0xD0
    722, 722, 722, 722, 722, 722, 722, 564, 722, 722, 722, 722, 722, 722, 556, 500,
    // 0xE0
    444, 444, 444, 444, 444, 444, 667, 444, 444, 444, 444, 444, 278, 278, 278, 278,
    // 0xF0
    500, 500, 500, 500, 500, 500, 500, 564, 500, 500, 500, 500, 500, 500, 500, 500,
];

/// Map a character to its `WinAnsiEncoding` code
pub fn win_ansi_code(ch: char) -> Option<u8> {
    let code = match ch {
        ' '..='~' | '\u{A0}'..='\u{FF}' => ch as u32 as u8,
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => return None,
    };
    Some(code)
}

/// Replace characters the font cannot show with close equivalents
///
/// Newlines are kept. Characters with no equivalent pass through untouched
/// and are rejected later by [`FontMetrics::encode`].
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\t' => out.push_str(TAB),
            '\r' | '\u{AD}' | '\u{200B}'..='\u{200D}' | '\u{2060}' | '\u{FEFF}' => {}
            '\u{0B}' | '\u{0C}' | '\u{2028}' | '\u{2029}' => out.push('\n'),
            '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}' | '\u{3000}' => out.push(' '),
            '\u{2010}' | '\u{2011}' | '\u{2043}' | '\u{2212}' => out.push('-'),
            '\u{2012}' => out.push('\u{2013}'),
            '\u{2015}' => out.push('\u{2014}'),
            '\u{2032}' | '\u{201B}' => out.push('\''),
            '\u{2033}' | '\u{201F}' => out.push('"'),
            '\u{2027}' | '\u{2219}' | '\u{25CF}' => out.push('\u{2022}'),
            '\u{FB00}' => out.push_str("ff"),
            '\u{FB01}' => out.push_str("fi"),
            '\u{FB02}' => out.push_str("fl"),
            '\u{FB03}' => out.push_str("ffi"),
            '\u{FB04}' => out.push_str("ffl"),
            '\u{FB05}' | '\u{FB06}' => out.push_str("st"),
            _ => out.push(ch),
        }
    }
    out
}

fn glyph_units(ch: char) -> Result<u32> {
    let code = win_ansi_code(ch).ok_or_else(|| RenderError::unsupported(ch))?;
    match WIDTHS[usize::from(code) - 0x20] {
        0 => Err(RenderError::unsupported(ch)),
        width => Ok(u32::from(width)),
    }
}

/// Metrics of Times-Roman at a fixed size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    size: f32,
}

impl FontMetrics {
    pub fn times_roman(size: f32) -> Self {
        Self { size }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Distance between consecutive baselines
    pub fn line_height(&self) -> f32 {
        (BBOX_TOP - BBOX_BOTTOM) / UNITS_PER_EM * self.size
    }

    /// Distance from the top of a line box to its baseline
    pub fn ascent(&self) -> f32 {
        BBOX_TOP / UNITS_PER_EM * self.size
    }

    /// Width of text in font units (1/1000 em)
    pub fn units(&self, text: &str) -> Result<u32> {
        text.chars().map(glyph_units).sum()
    }

    /// Width of text in points
    pub fn measure(&self, text: &str) -> Result<f32> {
        Ok(self.to_points(self.units(text)?))
    }

    /// Convert font units to points at this size
    pub fn to_points(&self, units: u32) -> f32 {
        units as f32 * self.size / UNITS_PER_EM
    }

    /// Convert points to whole font units at this size, rounding down
    pub fn to_units(&self, points: f32) -> u32 {
        (points * UNITS_PER_EM / self.size).floor().max(0.0) as u32
    }

    /// Encode text as `WinAnsiEncoding` bytes
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        text.chars()
            .map(|ch| {
                glyph_units(ch)?;
                win_ansi_code(ch).ok_or_else(|| RenderError::unsupported(ch))
            })
            .collect()
    }
}
