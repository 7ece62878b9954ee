//! Simulated backend services for the medwatch demo console.
//!
//! All data here is hardcoded and fictional; no external systems are
//! contacted. These implementations stand in for the three production
//! backends so the full aggregation pipeline can run offline.
//!
//! Sentinel identifiers drive the alternate outcomes:
//! - ids ending in `nf` — risk scoring reports "Beneficiary ID not found"
//! - ids ending in `dc` — risk scoring fails at the transport level
//! - ids ending in `ni` — care insight reports no retrievable insights
//! - ids ending in `zc` — recency reports a zero last-year cost

use async_trait::async_trait;

use medwatch_contracts::{
    care::{CareInsight, CareSuggestion},
    error::{MedwatchError, MedwatchResult, ServiceKind},
    identifier::BeneficiaryId,
    prediction::{PredictionResult, TierCode},
    recency::RecencyRecord,
};
use medwatch_session::traits::{CareService, RecencyService, RiskService};

/// Deterministic pseudo-score seed from the identifier bytes.
fn seed(id: &BeneficiaryId) -> u64 {
    id.as_str().bytes().map(u64::from).sum()
}

/// Recommended care actions per tier (tier 1 is the highest risk).
fn tier_actions(tier: &str) -> Vec<String> {
    let actions: &[&str] = match tier {
        "1" => &[
            "Immediate intensive case management",
            "Specialist referral",
            "Home health assessment",
        ],
        "2" => &[
            "Care coordinator assignment",
            "Follow-up in 7 days",
            "Medication review",
        ],
        "3" => &["Outpatient follow-up", "Chronic disease coaching"],
        "4" => &["Preventive care follow-up", "Lifestyle coaching"],
        _ => &["Routine screening", "Preventive reminders"],
    };
    actions.iter().map(|a| a.to_string()).collect()
}

// ── Risk scoring (mock) ───────────────────────────────────────────────────────

/// Canned risk scoring: stable scores and tier derived from the identifier.
pub struct MockRiskService;

#[async_trait]
impl RiskService for MockRiskService {
    async fn predict(&self, beneficiary: &BeneficiaryId) -> MedwatchResult<PredictionResult> {
        let id = beneficiary.as_str();
        if id.ends_with("nf") {
            return Err(MedwatchError::Service {
                service: ServiceKind::Risk,
                message: "Beneficiary ID not found".to_string(),
            });
        }
        if id.ends_with("dc") {
            return Err(MedwatchError::Transport {
                service: ServiceKind::Risk,
                reason: "connection refused".to_string(),
            });
        }

        let seed = seed(beneficiary);
        let tier = TierCode(((seed % 5) + 1).to_string());
        let risk_30 = (seed % 200) as f64 / 10.0;
        let risk_60 = (seed % 170) as f64 / 10.0;
        let risk_90 = (seed % 140) as f64 / 10.0;

        Ok(PredictionResult {
            beneficiary: beneficiary.clone(),
            risk_30,
            risk_60,
            risk_90,
            story: format!(
                "For 30-day risk, main drivers are: Frequent visits (last 90 days): {:.0} → increases risk; \
                 Number of chronic conditions: {} → increases risk.",
                risk_30, (seed % 4) + 1
            ),
            recommended: tier_actions(&tier.0),
            shap_img: Some(format!("{}_Risk30_shap.png", id)),
            tier,
        })
    }
}

// ── Care insight (mock) ───────────────────────────────────────────────────────

/// Canned care insight: two fictional conditions with sourced suggestions.
pub struct MockCareService;

#[async_trait]
impl CareService for MockCareService {
    async fn insights(&self, beneficiary: &BeneficiaryId) -> MedwatchResult<CareInsight> {
        if beneficiary.as_str().ends_with("ni") {
            return Err(MedwatchError::Service {
                service: ServiceKind::Care,
                message: "Failed to retrieve insights".to_string(),
            });
        }

        Ok(CareInsight {
            beneficiary: beneficiary.clone(),
            diseases: vec![
                "Diabetes".to_string(),
                "Congestive heart failure".to_string(),
            ],
            suggestions: vec![
                CareSuggestion {
                    disease: "Diabetes".to_string(),
                    suggestion: "Schedule quarterly HbA1c checks and review hypoglycemia \
                                 awareness at the next visit."
                        .to_string(),
                    source_chunks: vec![
                        "Glycemic monitoring at three-month intervals is recommended for \
                         patients with established type 2 diabetes."
                            .to_string(),
                    ],
                },
                CareSuggestion {
                    disease: "Congestive heart failure".to_string(),
                    suggestion: "Reinforce daily weight tracking; escalate on a gain of more \
                                 than two kilograms in three days."
                        .to_string(),
                    source_chunks: vec![
                        "Short-interval weight gain is an early indicator of fluid retention \
                         in heart failure patients."
                            .to_string(),
                    ],
                },
            ],
        })
    }
}

// ── Recency (mock) ────────────────────────────────────────────────────────────

/// Canned recency cost: deterministic nonzero cost unless the identifier
/// carries the zero-cost sentinel.
pub struct MockRecencyService;

#[async_trait]
impl RecencyService for MockRecencyService {
    async fn recency(&self, beneficiary: &BeneficiaryId) -> MedwatchResult<RecencyRecord> {
        let cost = if beneficiary.as_str().ends_with("zc") {
            0.0
        } else {
            8_000.0 + ((seed(beneficiary) % 50) as f64) * 100.0
        };
        Ok(RecencyRecord {
            beneficiary: beneficiary.clone(),
            last_year_total_cost: Some(cost),
        })
    }
}
