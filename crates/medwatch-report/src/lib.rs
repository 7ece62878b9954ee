//! # medwatch-report
//!
//! The report synthesizer: assembles an ordered multi-section patient
//! document (and a bulk tabular export) from whichever results the
//! session currently holds, then serializes it to PDF bytes for the
//! external save mechanism.

pub mod context;
pub mod document;
pub mod pdf;
pub mod table;

pub use context::ReportContext;
pub use document::{synthesize, Block, Document, Section};
pub use pdf::render;
pub use table::{export_table, EXPORT_ROW_LIMIT};
