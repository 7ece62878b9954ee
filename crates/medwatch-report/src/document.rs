//! The report document model and section synthesis.
//!
//! `synthesize` builds an ordered, multi-section document from whichever
//! results the context carries. Sections are never omitted: a missing
//! result renders its fixed placeholder sentence instead, so every report
//! has the same shape regardless of which operations have resolved.

use serde::Serialize;
use tracing::debug;

use crate::context::ReportContext;

/// Fixed placeholder for a report with no resolved prediction.
pub const NO_PREDICTIONS: &str = "No predictions available.";
/// Fixed placeholder for a report with no resolved care insight.
pub const NO_CARE_SUGGESTIONS: &str = "No care suggestions.";
/// Fixed placeholder for a report with no available ROI estimate.
pub const NO_ROI: &str = "No ROI available.";
/// Placeholder inside the care section when no conditions were detected.
pub const NO_DETECTED_CONDITIONS: &str = "No detected conditions.";

/// One content block inside a section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Block {
    /// A plain paragraph of text.
    Paragraph(String),
    /// An unordered bullet list.
    Bullets(Vec<String>),
    /// A header row plus data rows, all pre-rendered to display strings.
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

/// An ordered section with an optional heading.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub heading: Option<String>,
    pub blocks: Vec<Block>,
}

impl Section {
    fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: Some(heading.into()),
            blocks: Vec::new(),
        }
    }

    fn unheaded() -> Self {
        Self {
            heading: None,
            blocks: Vec::new(),
        }
    }

    fn paragraph(mut self, text: impl Into<String>) -> Self {
        self.blocks.push(Block::Paragraph(text.into()));
        self
    }

    fn bullets(mut self, items: Vec<String>) -> Self {
        self.blocks.push(Block::Bullets(items));
        self
    }
}

/// A complete, ordered report document ready for serialization.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Document title; also used as the PDF title.
    pub title: String,
    /// Sections in render order.
    pub sections: Vec<Section>,
}

impl Document {
    /// All paragraph and bullet text in order, for content assertions.
    pub fn text_lines(&self) -> Vec<&str> {
        let mut lines = Vec::new();
        for section in &self.sections {
            if let Some(heading) = &section.heading {
                lines.push(heading.as_str());
            }
            for block in &section.blocks {
                match block {
                    Block::Paragraph(text) => lines.push(text.as_str()),
                    Block::Bullets(items) => lines.extend(items.iter().map(String::as_str)),
                    Block::Table { header, rows } => {
                        lines.extend(header.iter().map(String::as_str));
                        for row in rows {
                            lines.extend(row.iter().map(String::as_str));
                        }
                    }
                }
            }
        }
        lines
    }
}

/// Build the patient analytics report from whichever results exist.
///
/// Section order is fixed: title, risk tier prediction, care management
/// insights, ROI estimate, footer. Absent results produce their
/// placeholder sentence — never an omitted section, never an error.
pub fn synthesize(context: &ReportContext) -> Document {
    debug!(
        beneficiary = %context.beneficiary,
        has_prediction = context.prediction.is_some(),
        has_care = context.care.is_some(),
        has_roi = context.roi.is_some(),
        "synthesizing patient report"
    );

    let mut sections = Vec::new();

    // ── Risk tier prediction ──────────────────────────────────────────────────
    let mut risk = Section::new("Risk tier prediction");
    match &context.prediction {
        Some(prediction) => {
            risk = risk
                .paragraph(format!("30 days: {}", prediction.risk_30))
                .paragraph(format!("60 days: {}", prediction.risk_60))
                .paragraph(format!("90 days: {}", prediction.risk_90))
                .paragraph(format!("Risk tier: {}", prediction.tier))
                .paragraph(prediction.story.clone());
            if !prediction.recommended.is_empty() {
                risk = risk
                    .paragraph("Recommended actions:")
                    .bullets(prediction.recommended.clone());
            }
        }
        None => {
            risk = risk.paragraph(NO_PREDICTIONS);
        }
    }
    sections.push(risk);

    // ── Care management insights ──────────────────────────────────────────────
    let mut care = Section::new("Care Management Insights");
    match &context.care {
        Some(insight) => {
            if insight.diseases.is_empty() {
                care = care.paragraph(NO_DETECTED_CONDITIONS);
            } else {
                care = care
                    .paragraph("Detected Conditions:")
                    .bullets(insight.diseases.clone());
            }
            if insight.suggestions.is_empty() {
                care = care.paragraph(NO_CARE_SUGGESTIONS);
            } else {
                care = care.paragraph("Care Suggestions:");
                for (index, suggestion) in insight.suggestions.iter().enumerate() {
                    care = care.paragraph(format!(
                        "{}. {}: {}",
                        index + 1,
                        suggestion.disease,
                        suggestion.suggestion
                    ));
                    if !suggestion.source_chunks.is_empty() {
                        care = care.bullets(suggestion.source_chunks.clone());
                    }
                }
            }
        }
        None => {
            care = care.paragraph(NO_CARE_SUGGESTIONS);
        }
    }
    sections.push(care);

    // ── ROI estimate ──────────────────────────────────────────────────────────
    let mut roi = Section::new("ROI Estimate");
    match &context.roi {
        Some(estimate) => {
            roi = roi
                .paragraph(format!("Last-year expense: {:.2}", estimate.last_year_expense))
                .paragraph(format!(
                    "Last-year total spend: {:.2}",
                    estimate.last_year_total_spend
                ))
                .paragraph(format!("Risk tier: {}", estimate.tier))
                .paragraph(format!("Reduction fraction: {:.2}", estimate.reduction))
                .paragraph(format!("Proxy ROI: {:.4}", estimate.proxy_roi));
        }
        None => {
            roi = roi.paragraph(NO_ROI);
        }
    }
    sections.push(roi);

    // ── Footer ────────────────────────────────────────────────────────────────
    let mut footer =
        Section::unheaded().paragraph(format!("Generated at {}", context.generated_at.to_rfc3339()));
    if let Some(fingerprint) = &context.dataset_fingerprint {
        footer = footer.paragraph(format!("Dataset fingerprint: {}", fingerprint));
    }
    sections.push(footer);

    Document {
        title: format!("Patient Analytics Report - {}", context.beneficiary),
        sections,
    }
}
