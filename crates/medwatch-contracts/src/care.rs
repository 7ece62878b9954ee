//! Care management insight domain types.

use serde::{Deserialize, Serialize};

use crate::identifier::BeneficiaryId;

/// One recommended intervention tied to a detected condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareSuggestion {
    /// The condition this suggestion addresses.
    pub disease: String,
    /// Free-text care advice.
    pub suggestion: String,
    /// Supporting source excerpts, in retrieval order.
    pub source_chunks: Vec<String>,
}

/// Care insight result for one beneficiary.
///
/// Same lifecycle as `PredictionResult`: created per query, replaced
/// wholesale by the next query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareInsight {
    /// The beneficiary these insights were produced for.
    pub beneficiary: BeneficiaryId,
    /// Detected condition names.
    pub diseases: Vec<String>,
    /// Per-condition care suggestions.
    pub suggestions: Vec<CareSuggestion>,
}
