//! PDF serialization of a report document.
//!
//! A4 portrait, builtin Helvetica fonts, simple y-cursor layout with
//! wrapped lines and page breaks. The caller receives raw bytes; saving
//! them anywhere is the external save mechanism's concern.

use std::io::BufWriter;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use tracing::debug;

use medwatch_contracts::error::{MedwatchError, MedwatchResult};

use crate::document::{Block, Document};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 20.0;
const INDENT: f32 = 25.0;
const TOP_Y: f32 = 280.0;
const BOTTOM_Y: f32 = 15.0;
const WRAP_COLUMNS: usize = 90;

fn report_error(context: &str, err: impl std::fmt::Display) -> MedwatchError {
    MedwatchError::Report {
        reason: format!("{}: {}", context, err),
    }
}

/// Break `text` into lines of at most `max_chars` characters on word
/// boundaries. A single overlong word becomes its own line.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Tracks the write position and opens new pages as the cursor runs out.
struct PageCursor<'a> {
    doc: &'a printpdf::PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl<'a> PageCursor<'a> {
    fn advance(&mut self, step: f32) {
        self.y -= step;
        if self.y < BOTTOM_Y {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP_Y;
        }
    }

    fn text(&mut self, text: &str, size: f32, x: f32, font: &IndirectFontRef, step: f32) {
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
        self.advance(step);
    }

    fn wrapped(&mut self, text: &str, size: f32, x: f32, font: &IndirectFontRef, step: f32) {
        for line in wrap_text(text, WRAP_COLUMNS) {
            self.text(&line, size, x, font, step);
        }
    }
}

/// Render `document` to PDF bytes.
pub fn render(document: &Document) -> MedwatchResult<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        &document.title,
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| report_error("PDF font error", e))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| report_error("PDF font error", e))?;

    let mut cursor = PageCursor {
        doc: &doc,
        layer: doc.get_page(page).get_layer(layer),
        y: TOP_Y,
    };

    cursor.text(&document.title, 14.0, MARGIN_LEFT, &bold, 10.0);

    for section in &document.sections {
        if let Some(heading) = &section.heading {
            cursor.advance(2.0);
            cursor.text(heading, 11.0, MARGIN_LEFT, &bold, 6.0);
        }
        for block in &section.blocks {
            match block {
                Block::Paragraph(text) => {
                    cursor.wrapped(text, 9.0, MARGIN_LEFT, &font, 4.5);
                    cursor.advance(1.5);
                }
                Block::Bullets(items) => {
                    for item in items {
                        cursor.wrapped(&format!("· {}", item), 9.0, INDENT, &font, 4.5);
                    }
                    cursor.advance(1.5);
                }
                Block::Table { header, rows } => {
                    cursor.wrapped(&header.join(" | "), 8.0, MARGIN_LEFT, &bold, 4.0);
                    for row in rows {
                        cursor.wrapped(&row.join(" | "), 8.0, MARGIN_LEFT, &font, 4.0);
                    }
                    cursor.advance(1.5);
                }
            }
        }
    }

    debug!(title = %document.title, "report rendered to PDF");

    let mut buffer = BufWriter::new(Vec::new());
    doc.save(&mut buffer)
        .map_err(|e| report_error("PDF save error", e))?;
    buffer
        .into_inner()
        .map_err(|e| report_error("PDF buffer error", e))
}
