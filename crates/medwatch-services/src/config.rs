//! Service endpoint configuration.
//!
//! `ServiceEndpoints` is deserialized from a TOML document naming the base
//! URL of each backend. Nothing else about the backends is configurable —
//! paths and verbs are fixed by the service contracts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use medwatch_contracts::error::{MedwatchError, MedwatchResult};

/// Base URLs for the three backend services.
///
/// Example:
/// ```toml
/// risk_url = "http://127.0.0.1:5000/predict"
/// care_url = "http://127.0.0.1:5001"
/// recency_url = "http://127.0.0.1:5002"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEndpoints {
    /// Full URL the risk request body is POSTed to.
    pub risk_url: String,
    /// Base URL for the care insight service; `/patient/{id}` is appended.
    pub care_url: String,
    /// Base URL for the recency service; `/recency/{id}` is appended.
    pub recency_url: String,
}

impl ServiceEndpoints {
    /// Parse `s` as a TOML endpoint configuration.
    ///
    /// Returns `MedwatchError::Config` if the TOML is malformed or does not
    /// match the expected schema.
    pub fn from_toml_str(s: &str) -> MedwatchResult<Self> {
        toml::from_str(s).map_err(|e| MedwatchError::Config {
            reason: format!("failed to parse endpoint TOML: {}", e),
        })
    }

    /// Read the file at `path` and parse it as TOML endpoint configuration.
    pub fn from_file(path: &Path) -> MedwatchResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| MedwatchError::Config {
            reason: format!("failed to read endpoint file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The care insight URL for `id`.
    pub fn care_patient_url(&self, id: &str) -> String {
        format!("{}/patient/{}", self.care_url.trim_end_matches('/'), id)
    }

    /// The recency URL for `id`.
    pub fn recency_patient_url(&self, id: &str) -> String {
        format!("{}/recency/{}", self.recency_url.trim_end_matches('/'), id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
risk_url = "http://127.0.0.1:5000/predict"
care_url = "http://127.0.0.1:5001"
recency_url = "http://127.0.0.1:5002/"
"#;

    #[test]
    fn parses_well_formed_toml() {
        let endpoints = ServiceEndpoints::from_toml_str(SAMPLE).unwrap();
        assert_eq!(endpoints.risk_url, "http://127.0.0.1:5000/predict");
    }

    #[test]
    fn rejects_missing_field() {
        let err = ServiceEndpoints::from_toml_str("risk_url = \"x\"").unwrap_err();
        assert!(matches!(err, MedwatchError::Config { .. }));
    }

    #[test]
    fn patient_urls_handle_trailing_slash() {
        let endpoints = ServiceEndpoints::from_toml_str(SAMPLE).unwrap();
        assert_eq!(
            endpoints.care_patient_url("X1"),
            "http://127.0.0.1:5001/patient/X1"
        );
        assert_eq!(
            endpoints.recency_patient_url("X1"),
            "http://127.0.0.1:5002/recency/X1"
        );
    }
}
