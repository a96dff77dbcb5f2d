//! The "RFP RESPONSE" divider page.
//!
//! The divider is a one-page US Letter document with a single line of bold
//! Helvetica text. It uses the standard Type1 font, so nothing is embedded and
//! rendering cannot fail. A fresh document is built for every merge.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};

use crate::error::Result;
use crate::io::DocumentSource;

/// Page size in PDF points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    /// Width in points.
    pub width: f32,
    /// Height in points.
    pub height: f32,
}

impl PageSize {
    /// US Letter (8.5" × 11").
    pub const LETTER: Self = Self {
        width: 612.0,
        height: 792.0,
    };
}

/// Text drawn on the divider.
pub const DIVIDER_TEXT: &str = "RFP RESPONSE";

/// Base font of the divider text.
pub const DIVIDER_FONT: &str = "Helvetica-Bold";

/// Font size of the divider text.
pub const DIVIDER_FONT_SIZE: f32 = 40.0;

/// Horizontal center line of the text.
pub const DIVIDER_CENTER_X: f32 = 300.0;

/// Baseline of the text, measured from the bottom edge.
pub const DIVIDER_BASELINE_Y: f32 = 500.0;

/// Generator for the divider page.
pub struct DividerPage;

impl DividerPage {
    /// Build the one-page divider document.
    pub fn generate() -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => DIVIDER_FONT,
            "Encoding" => "WinAnsiEncoding",
        });

        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let x = DIVIDER_CENTER_X - text_width(DIVIDER_TEXT, DIVIDER_FONT_SIZE) / 2.0;
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), DIVIDER_FONT_SIZE.into()]),
                Operation::new("Td", vec![x.into(), DIVIDER_BASELINE_Y.into()]),
                Operation::new("Tj", vec![Object::string_literal(DIVIDER_TEXT)]),
                Operation::new("ET", vec![]),
            ],
        };

        // Encoding a fixed operation list with simple operands cannot fail.
        let content_bytes = content.encode().unwrap_or_default();
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content_bytes));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                PageSize::LETTER.width.into(),
                PageSize::LETTER.height.into(),
            ],
            "Contents" => content_id,
            "Resources" => resources_id,
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        doc
    }

    /// The divider as a merge source.
    pub fn source() -> DocumentSource {
        DocumentSource::generated("RFP RESPONSE divider", Self::generate())
    }

    /// Serialize the divider to PDF bytes.
    pub fn to_bytes() -> Result<Vec<u8>> {
        let mut doc = Self::generate();
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

/// Width of `text` set in Helvetica-Bold at `size` points.
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text.chars().map(helvetica_bold_advance).sum();
    units as f32 * size / 1000.0
}

/// Advance width of a glyph in 1/1000 em (Helvetica-Bold AFM metrics).
fn helvetica_bold_advance(c: char) -> u32 {
    match c {
        ' ' => 278,
        'I' => 278,
        'J' => 556,
        'E' | 'P' | 'S' | 'V' | 'X' | 'Y' => 667,
        'F' | 'L' | 'T' | 'Z' => 611,
        'G' | 'O' | 'Q' => 778,
        'M' => 833,
        'W' => 944,
        'A' | 'B' | 'C' | 'D' | 'H' | 'K' | 'N' | 'R' | 'U' => 722,
        '0'..='9' => 556,
        _ => 611,
    }
}
