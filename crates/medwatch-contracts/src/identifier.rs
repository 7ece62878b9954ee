//! Beneficiary and query identity types.
//!
//! `BeneficiaryId` is the key joining the dataset, all three services, and
//! the report. `QueryId` identifies one issued request for logging and
//! stale-resolution tracking.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MedwatchError;

/// Unique key identifying a patient across the dataset and all services.
///
/// The wrapped string is guaranteed non-empty and trimmed — every lookup
/// path requires a valid identifier before a request may be issued.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BeneficiaryId(String);

impl BeneficiaryId {
    /// Validate and wrap a raw identifier string.
    ///
    /// Leading/trailing whitespace is stripped; an identifier that is empty
    /// after trimming is rejected with `MedwatchError::EmptyIdentifier`.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, MedwatchError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(MedwatchError::EmptyIdentifier);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The validated identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BeneficiaryId {
    type Error = MedwatchError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<BeneficiaryId> for String {
    fn from(id: BeneficiaryId) -> Self {
        id.0
    }
}

impl fmt::Display for BeneficiaryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a single issued service request.
///
/// Appears in structured log fields so interleaved resolutions can be
/// matched back to the request that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryId(pub uuid::Uuid);

impl QueryId {
    /// Create a new, unique query ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for QueryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
