//! PDF serialization of rendered documents
//!
//! Output is deterministic: no creation dates, no document IDs, object
//! numbers assigned in page order. The same [`RenderedDocument`] always
//! produces the same bytes, whichever sink it is written to.

use std::io::Write;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};

use super::error::Result;
use super::metrics::{FontMetrics, FONT_ENCODING, FONT_NAME};
use super::types::{Color, Page, PageGeometry, RenderedDocument, TextRun};

pub const PDF_VERSION: &str = "1.5";

const FONT_RESOURCE: &str = "F1";
const STRIKE_WIDTH_RATIO: f32 = 1.0 / 12.0;

/// Serializes a [`RenderedDocument`] to PDF
#[derive(Debug, Clone, Copy)]
pub struct PdfWriter {
    compress: bool,
}

impl PdfWriter {
    pub fn new() -> Self {
        Self { compress: true }
    }

    /// Leave content streams uncompressed (useful when inspecting output)
    pub fn uncompressed() -> Self {
        Self { compress: false }
    }

    /// Serialize into any sink
    pub fn write_to<W: Write>(&self, document: &RenderedDocument, sink: &mut W) -> Result<()> {
        let mut pdf = self.build(document)?;
        pdf.save_to(sink)?;
        Ok(())
    }

    /// Serialize into memory
    pub fn to_bytes(&self, document: &RenderedDocument) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write_to(document, &mut bytes)?;
        Ok(bytes)
    }

    fn build(&self, document: &RenderedDocument) -> Result<Document> {
        let geometry = document.geometry;
        let metrics = FontMetrics::times_roman(geometry.font_size);

        let mut pdf = Document::with_version(PDF_VERSION);
        let pages_id = pdf.new_object_id();

        let font_id = pdf.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => FONT_NAME,
            "Encoding" => FONT_ENCODING,
        });
        let resources_id = pdf.add_object(dictionary! {
            "Font" => dictionary! {
                FONT_RESOURCE => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(document.pages.len());
        for page in &document.pages {
            let content = page_content(page, &geometry, &metrics)?;
            let content_id = pdf.add_object(Stream::new(Dictionary::new(), content.encode()?));
            let page_id = pdf.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(geometry.width),
                Object::Real(geometry.height),
            ],
        };
        pdf.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = pdf.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        pdf.trailer.set("Root", catalog_id);

        if self.compress {
            pdf.compress();
        }
        Ok(pdf)
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn page_content(page: &Page, geometry: &PageGeometry, metrics: &FontMetrics) -> Result<Content> {
    let mut operations = Vec::new();
    let mut fill: Option<Color> = None;

    for run in &page.runs {
        if fill != Some(run.color) {
            operations.push(Operation::new("rg", color_operands(run.color)));
            fill = Some(run.color);
        }
        text_operations(run, geometry, metrics, &mut operations)?;
        if run.strike.is_some() {
            strike_operations(run, geometry, &mut operations);
        }
    }

    Ok(Content { operations })
}

fn text_operations(
    run: &TextRun,
    geometry: &PageGeometry,
    metrics: &FontMetrics,
    operations: &mut Vec<Operation>,
) -> Result<()> {
    let encoded = metrics.encode(&run.text)?;
    let baseline = geometry.height - (run.y + metrics.ascent());

    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new(
        "Tf",
        vec![FONT_RESOURCE.into(), real(run.font_size)],
    ));
    operations.push(Operation::new("Td", vec![real(run.x), real(baseline)]));
    operations.push(Operation::new(
        "Tj",
        vec![Object::String(encoded, StringFormat::Hexadecimal)],
    ));
    operations.push(Operation::new("ET", vec![]));
    Ok(())
}

fn strike_operations(run: &TextRun, geometry: &PageGeometry, operations: &mut Vec<Operation>) {
    let Some(strike) = run.strike else {
        return;
    };
    let y = geometry.height - strike.y;

    operations.push(Operation::new("q", vec![]));
    operations.push(Operation::new("RG", color_operands(run.color)));
    operations.push(Operation::new(
        "w",
        vec![real(run.font_size * STRIKE_WIDTH_RATIO)],
    ));
    operations.push(Operation::new("m", vec![real(strike.x1), real(y)]));
    operations.push(Operation::new("l", vec![real(strike.x2), real(y)]));
    operations.push(Operation::new("S", vec![]));
    operations.push(Operation::new("Q", vec![]));
}

fn color_operands(color: Color) -> Vec<Object> {
    vec![real(color.r), real(color.g), real(color.b)]
}

/// Round to hundredths of a point
fn real(value: f32) -> Object {
    Object::Real((value * 100.0).round() / 100.0)
}
