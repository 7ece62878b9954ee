//! Wire-level request and response schemas for the three backend services.
//!
//! Field names are part of the service contracts and are preserved exactly
//! as the backends emit them (`Risk_30`, `LAST_YEAR_TOTAL_COST`, ...).
//! Every response is an untagged envelope whose failure variant is declared
//! first, so a payload carrying an `error` field can never fall through to
//! the success shape.

use serde::{Deserialize, Serialize};

use crate::{
    care::{CareInsight, CareSuggestion},
    error::{MedwatchError, MedwatchResult, ServiceKind},
    identifier::BeneficiaryId,
    prediction::{PredictionResult, TierCode},
    recency::RecencyRecord,
};

// ── Shared failure shape ──────────────────────────────────────────────────────

/// An application-level error payload: a well-formed JSON body carrying a
/// single `error` message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceFailure {
    /// The backend's own error text, surfaced verbatim.
    pub error: String,
}

// ── Risk scoring service ──────────────────────────────────────────────────────

/// Request body for the risk scoring service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskRequest {
    /// The beneficiary to score.
    pub bene_id: String,
}

impl RiskRequest {
    /// Build the request body for `beneficiary`.
    pub fn new(beneficiary: &BeneficiaryId) -> Self {
        Self { bene_id: beneficiary.as_str().to_string() }
    }
}

/// The tier field arrives as either a bare JSON number or a string,
/// depending on the backend revision. Both normalize to `TierCode`.
fn deserialize_tier<'de, D>(deserializer: D) -> Result<TierCode, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum WireTier {
        Number(i64),
        Text(String),
    }

    Ok(match WireTier::deserialize(deserializer)? {
        WireTier::Number(n) => TierCode(n.to_string()),
        WireTier::Text(s) => TierCode(s),
    })
}

/// Successful risk scoring response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskPayload {
    #[serde(rename = "Risk_30")]
    pub risk_30: f64,
    #[serde(rename = "Risk_60")]
    pub risk_60: f64,
    #[serde(rename = "Risk_90")]
    pub risk_90: f64,
    #[serde(rename = "Tier", deserialize_with = "deserialize_tier")]
    pub tier: TierCode,
    pub story: String,
    #[serde(default)]
    pub recommended: Vec<String>,
    #[serde(default)]
    pub shap_img: Option<String>,
}

impl RiskPayload {
    /// Convert the wire payload into the domain result for `beneficiary`.
    pub fn into_domain(self, beneficiary: BeneficiaryId) -> PredictionResult {
        PredictionResult {
            beneficiary,
            risk_30: self.risk_30,
            risk_60: self.risk_60,
            risk_90: self.risk_90,
            tier: self.tier,
            story: self.story,
            recommended: self.recommended,
            shap_img: self.shap_img,
        }
    }
}

/// Risk scoring response envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RiskResponse {
    Failure(ServiceFailure),
    Success(RiskPayload),
}

impl RiskResponse {
    /// Resolve the envelope into a domain result or a service error.
    pub fn into_domain(self, beneficiary: BeneficiaryId) -> MedwatchResult<PredictionResult> {
        match self {
            RiskResponse::Failure(f) => Err(MedwatchError::Service {
                service: ServiceKind::Risk,
                message: f.error,
            }),
            RiskResponse::Success(p) => Ok(p.into_domain(beneficiary)),
        }
    }
}

// ── Care insight service ──────────────────────────────────────────────────────

/// Successful care insight response body.
///
/// The backend may omit either list; an absent list decodes as empty, the
/// same tolerance the consuming views have always had.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarePayload {
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub diseases: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<CareSuggestion>,
}

impl CarePayload {
    /// Convert the wire payload into the domain result for `beneficiary`.
    pub fn into_domain(self, beneficiary: BeneficiaryId) -> CareInsight {
        CareInsight {
            beneficiary,
            diseases: self.diseases,
            suggestions: self.suggestions,
        }
    }
}

/// Care insight response envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CareResponse {
    Failure(ServiceFailure),
    Success(CarePayload),
}

impl CareResponse {
    /// Resolve the envelope into a domain result or a service error.
    pub fn into_domain(self, beneficiary: BeneficiaryId) -> MedwatchResult<CareInsight> {
        match self {
            CareResponse::Failure(f) => Err(MedwatchError::Service {
                service: ServiceKind::Care,
                message: f.error,
            }),
            CareResponse::Success(p) => Ok(p.into_domain(beneficiary)),
        }
    }
}

// ── Recency service ───────────────────────────────────────────────────────────

/// Successful recency response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecencyPayload {
    #[serde(rename = "LAST_YEAR_TOTAL_COST", default)]
    pub last_year_total_cost: Option<f64>,
}

impl RecencyPayload {
    /// Convert the wire payload into the domain record for `beneficiary`.
    pub fn into_domain(self, beneficiary: BeneficiaryId) -> RecencyRecord {
        RecencyRecord {
            beneficiary,
            last_year_total_cost: self.last_year_total_cost,
        }
    }
}

/// Recency response envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecencyResponse {
    Failure(ServiceFailure),
    Success(RecencyPayload),
}

impl RecencyResponse {
    /// Resolve the envelope into a domain record or a service error.
    pub fn into_domain(self, beneficiary: BeneficiaryId) -> MedwatchResult<RecencyRecord> {
        match self {
            RecencyResponse::Failure(f) => Err(MedwatchError::Service {
                service: ServiceKind::Recency,
                message: f.error,
            }),
            RecencyResponse::Success(p) => Ok(p.into_domain(beneficiary)),
        }
    }
}
