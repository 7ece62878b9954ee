//! Risk prediction domain types.

use serde::{Deserialize, Serialize};

use crate::identifier::BeneficiaryId;

/// Ordinal risk tier code as reported by the risk scoring service.
///
/// Tiers `"1"` (highest risk) through `"5"` (lowest risk) carry a fixed
/// cost-reduction fraction; every other code maps to a reduction of zero.
/// Unrecognized codes are valid input, not an error — the service contract
/// does not promise a closed set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TierCode(pub String);

impl TierCode {
    /// The expected cost-reduction fraction for this tier.
    ///
    /// Total over all inputs: tiers "1"–"5" map to their fixed fractions,
    /// anything else maps to 0.0.
    pub fn reduction_fraction(&self) -> f64 {
        match self.0.as_str() {
            "1" => 0.25,
            "2" => 0.18,
            "3" => 0.12,
            "4" => 0.07,
            "5" => 0.03,
            _ => 0.0,
        }
    }
}

impl std::fmt::Display for TierCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A complete risk prediction for one beneficiary.
///
/// Created per query; a new query replaces the previous result wholesale.
/// Never partially updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    /// The beneficiary this prediction was produced for.
    pub beneficiary: BeneficiaryId,
    /// 30-day risk estimate.
    pub risk_30: f64,
    /// 60-day risk estimate.
    pub risk_60: f64,
    /// 90-day risk estimate.
    pub risk_90: f64,
    /// Ordinal risk tier.
    pub tier: TierCode,
    /// Narrative explanation of the main risk drivers.
    pub story: String,
    /// Recommended care actions for this tier.
    pub recommended: Vec<String>,
    /// Optional reference to a supporting visualization artifact.
    pub shap_img: Option<String>,
}
