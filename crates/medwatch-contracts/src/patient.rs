//! Patient dataset row type.
//!
//! A `PatientRecord` is created in bulk at dataset load and never mutated.
//! Values are stored exactly as they appear in the source file — chronic
//! condition flags keep their raw `"1"`/`"0"` encoding, and turning them
//! into "Yes"/"No" is a presentation concern layered on top at render time.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One immutable row of the loaded dataset, keyed by beneficiary ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    /// The DESYNPUF_ID column value, unique within the dataset.
    pub id: String,
    /// Raw column values keyed by header name. No type coercion is applied.
    fields: HashMap<String, String>,
}

impl PatientRecord {
    /// Build a record from its identifier and raw field map.
    pub fn new(id: impl Into<String>, fields: HashMap<String, String>) -> Self {
        Self { id: id.into(), fields }
    }

    /// The raw value stored for `column`, or `""` when the column is absent.
    pub fn field(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }
}
