//! Service trait definitions for the aggregation pipeline.
//!
//! These three traits define the complete service boundary:
//!
//! - `RiskService`    — risk scoring over 30/60/90-day windows
//! - `CareService`    — condition detection and care suggestions
//! - `RecencyService` — last-year cost lookup feeding the ROI engine
//!
//! Implementations live behind this seam and are treated as independently
//! failing collaborators: one service's failure never blocks another's
//! success path. The aggregator wires them together and owns all shared
//! state; implementations must not retain results of their own.

use async_trait::async_trait;

use medwatch_contracts::{
    care::CareInsight, error::MedwatchResult, identifier::BeneficiaryId,
    prediction::PredictionResult, recency::RecencyRecord,
};

/// The risk scoring service.
///
/// A successful prediction is the sole trigger for the dependent recency
/// fetch — the aggregator guarantees that ordering, not the implementation.
#[async_trait]
pub trait RiskService: Send + Sync {
    /// Score `beneficiary` across the three risk windows.
    async fn predict(&self, beneficiary: &BeneficiaryId) -> MedwatchResult<PredictionResult>;
}

/// The care insight service.
///
/// Fully independent of risk scoring; the two may resolve in either order.
#[async_trait]
pub trait CareService: Send + Sync {
    /// Fetch detected conditions and care suggestions for `beneficiary`.
    async fn insights(&self, beneficiary: &BeneficiaryId) -> MedwatchResult<CareInsight>;
}

/// The recency cost service.
///
/// Only ever queried after a successful risk prediction for the same
/// beneficiary within the same session generation.
#[async_trait]
pub trait RecencyService: Send + Sync {
    /// Fetch the last-year total cost for `beneficiary`.
    async fn recency(&self, beneficiary: &BeneficiaryId) -> MedwatchResult<RecencyRecord>;
}
