//! Dataset ingestion and search.
//!
//! A `Dataset` is built once from the raw delimited text and is immutable
//! afterwards; reloading replaces it wholesale. Ingestion truncates to the
//! first `RECORD_CAP` data rows in file order — a documented cap, not an
//! error condition.

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use tracing::{info, warn};

use medwatch_contracts::{
    error::{MedwatchError, MedwatchResult},
    patient::PatientRecord,
};

use crate::columns::{IDENTIFIER_COLUMN, REQUIRED_COLUMNS};

/// Maximum number of data rows retained from a single load.
pub const RECORD_CAP: usize = 10_000;

/// The loaded, immutable beneficiary dataset.
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<PatientRecord>,
    fingerprint: String,
}

impl Dataset {
    /// Parse `raw_text` as a delimited dataset with a header row.
    ///
    /// Fails with `MedwatchError::DatasetParse` when the header is missing a
    /// required column or any row is malformed — a failed load exposes no
    /// partial data. Rows past `RECORD_CAP` are dropped deterministically.
    pub fn load(raw_text: &str) -> MedwatchResult<Self> {
        let fingerprint = fingerprint(raw_text);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(raw_text.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| MedwatchError::DatasetParse {
                reason: format!("failed to read header row: {}", e),
            })?
            .clone();

        for required in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == *required) {
                return Err(MedwatchError::DatasetParse {
                    reason: format!("missing required column '{}'", required),
                });
            }
        }

        let mut records = Vec::new();
        let mut truncated = false;
        for row in reader.records() {
            if records.len() == RECORD_CAP {
                truncated = true;
                break;
            }
            let row = row.map_err(|e| MedwatchError::DatasetParse {
                reason: format!("malformed record: {}", e),
            })?;

            let mut fields = HashMap::with_capacity(headers.len());
            for (header, value) in headers.iter().zip(row.iter()) {
                fields.insert(header.to_string(), value.to_string());
            }
            let id = fields
                .get(IDENTIFIER_COLUMN)
                .cloned()
                .unwrap_or_default();
            records.push(PatientRecord::new(id, fields));
        }

        if truncated {
            warn!(cap = RECORD_CAP, "dataset exceeded record cap; extra rows dropped");
        }
        info!(
            record_count = records.len(),
            fingerprint = %fingerprint,
            "dataset loaded"
        );

        Ok(Self {
            columns: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            records,
            fingerprint,
        })
    }

    /// The fixed column set, in display order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All loaded records, in file order.
    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }

    /// Number of loaded records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records were loaded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Lowercase hex SHA-256 of the raw source text, computed at load.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Case-insensitive substring search against the identifier column only.
    ///
    /// Original order is preserved. An empty term matches every record; a
    /// term matching nothing returns an empty sequence.
    pub fn search(&self, term: &str) -> Vec<&PatientRecord> {
        let needle = term.to_uppercase();
        self.records
            .iter()
            .filter(|r| r.id.to_uppercase().contains(&needle))
            .collect()
    }
}

/// Lowercase 64-character hex SHA-256 of the dataset source text.
///
/// Recorded at load so reports and logs can state exactly which dataset
/// revision they were produced from.
pub fn fingerprint(raw_text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_text.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A minimal valid CSV with the full required column set and `n` rows.
    fn sample_csv(n: usize) -> String {
        let mut text = String::from(
            "DESYNPUF_ID,SP_ALZHDMTA,SP_CHF,SP_CHRNKIDN,SP_CNCR,SP_COPD,\
             SP_DEPRESSN,SP_DIABETES,SP_ISCHMCHT,SP_OSTEOPRS,SP_RA_OA,SP_STRKETIA,\
             chronic_count_2008,chronic_count_2009,chronic_count_2010,\
             total_visits,total_amount,avg_claim_amount\n",
        );
        for i in 0..n {
            text.push_str(&format!(
                "BENE{:05},1,0,0,1,0,0,1,0,0,0,0,2,3,3,14,12850.0,917.86\n",
                i
            ));
        }
        text
    }

    #[test]
    fn load_retains_rows_in_file_order() {
        let dataset = Dataset::load(&sample_csv(5)).unwrap();
        assert_eq!(dataset.len(), 5);
        assert_eq!(dataset.records()[0].id, "BENE00000");
        assert_eq!(dataset.records()[4].id, "BENE00004");
    }

    #[test]
    fn load_truncates_to_first_ten_thousand() {
        let dataset = Dataset::load(&sample_csv(15_000)).unwrap();
        assert_eq!(dataset.len(), RECORD_CAP);
        // Deterministic by file order: the first rows survive, the tail is dropped.
        assert_eq!(dataset.records()[0].id, "BENE00000");
        assert_eq!(dataset.records()[RECORD_CAP - 1].id, "BENE09999");
    }

    #[test]
    fn load_rejects_missing_required_column() {
        let text = "DESYNPUF_ID,SP_CHF\nBENE00001,1\n";
        match Dataset::load(text) {
            Err(MedwatchError::DatasetParse { reason }) => {
                assert!(reason.contains("missing required column"));
            }
            other => panic!("expected DatasetParse, got {:?}", other.map(|d| d.len())),
        }
    }

    #[test]
    fn load_rejects_malformed_row() {
        // A row with a field count that disagrees with the header is fatal;
        // no partial dataset is exposed.
        let mut text = sample_csv(2);
        text.push_str("BENE99999,1,0\n");
        assert!(matches!(
            Dataset::load(&text),
            Err(MedwatchError::DatasetParse { .. })
        ));
    }

    #[test]
    fn search_is_case_insensitive_and_order_preserving() {
        let dataset = Dataset::load(&sample_csv(20)).unwrap();
        let hits = dataset.search("bene0001");
        assert_eq!(hits.len(), 10);
        assert_eq!(hits[0].id, "BENE00010");
        assert_eq!(hits[9].id, "BENE00019");
    }

    #[test]
    fn search_absent_identifier_returns_empty() {
        let dataset = Dataset::load(&sample_csv(20)).unwrap();
        assert!(dataset.search("NOSUCHID").is_empty());
    }

    #[test]
    fn search_empty_term_matches_all() {
        let dataset = Dataset::load(&sample_csv(7)).unwrap();
        assert_eq!(dataset.search("").len(), 7);
    }

    #[test]
    fn fingerprint_is_stable_and_content_sensitive() {
        let a = sample_csv(3);
        let b = sample_csv(4);
        assert_eq!(fingerprint(&a), fingerprint(&a));
        assert_ne!(fingerprint(&a), fingerprint(&b));
        assert_eq!(fingerprint(&a).len(), 64);
    }

    #[test]
    fn records_store_raw_flag_values() {
        let dataset = Dataset::load(&sample_csv(1)).unwrap();
        let record = &dataset.records()[0];
        // Stored raw; "Yes"/"No" is a render-time concern.
        assert_eq!(record.field("SP_ALZHDMTA"), "1");
        assert_eq!(record.field("SP_CHF"), "0");
    }
}
