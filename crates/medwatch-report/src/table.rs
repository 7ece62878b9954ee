//! Bulk tabular export.
//!
//! Renders a header row plus a capped number of data rows into a document.
//! Flag columns are translated to "Yes"/"No" here, at render time — the
//! stored record values stay untouched.

use medwatch_contracts::patient::PatientRecord;
use medwatch_dataset::display_value;

use crate::document::{Block, Document, Section};

/// Default row cap for a bulk export.
pub const EXPORT_ROW_LIMIT: usize = 100;

/// Render `records` as a header row plus at most `limit` data rows.
///
/// Column order follows `columns`; a column absent from a record renders
/// as an empty cell.
pub fn export_table(records: &[&PatientRecord], columns: &[String], limit: usize) -> Document {
    let header: Vec<String> = columns.to_vec();
    let rows: Vec<Vec<String>> = records
        .iter()
        .take(limit)
        .map(|record| {
            columns
                .iter()
                .map(|column| display_value(column, record.field(column)).to_string())
                .collect()
        })
        .collect();

    Document {
        title: "MED Analytics - Patient Details".to_string(),
        sections: vec![Section {
            heading: None,
            blocks: vec![Block::Table { header, rows }],
        }],
    }
}
