//! The result aggregator: fan-out driver for the three services.
//!
//! The aggregator enforces the session model:
//!
//!   identifier → [risk | care] fan-out → (risk success) → recency → ROI
//!
//! The two fan-out calls are independent — each has its own lifecycle and
//! neither blocks or cancels the other. The recency fetch is a dependent
//! second stage: it is issued only after a successful risk response, within
//! the same generation, and its result feeds the ROI engine directly.
//!
//! Service errors do not propagate out of the run methods; they land in
//! the per-operation state with an analyst-facing message. The methods
//! only return `Err` for boundary violations: no identifier set, an
//! operation already in flight, or a poisoned state lock.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use medwatch_contracts::{
    error::{MedwatchError, MedwatchResult, ServiceKind},
    identifier::{BeneficiaryId, QueryId},
    prediction::TierCode,
};
use medwatch_roi::compute_roi;

use crate::{
    state::{OperationState, SessionInner, SessionSnapshot},
    traits::{CareService, RecencyService, RiskService},
};

/// Translate a service-layer failure into the analyst-facing message
/// stored in the operation state.
///
/// Transport failures collapse to the generic connection message;
/// application-level errors keep the backend's text verbatim.
fn surface_message(err: &MedwatchError) -> String {
    match err {
        MedwatchError::Transport { .. } => "Failed to connect to backend".to_string(),
        MedwatchError::Service { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

/// Drives per-identifier aggregation across the three services.
///
/// Construct one aggregator per analyst session. State mutation is
/// serialized behind a mutex that is only held across state writes, never
/// across an await — concurrent logical operations interleave freely.
pub struct Aggregator {
    risk: Arc<dyn RiskService>,
    care: Arc<dyn CareService>,
    recency: Arc<dyn RecencyService>,
    state: Mutex<SessionInner>,
}

impl Aggregator {
    /// Create an aggregator over the given service implementations.
    pub fn new(
        risk: Arc<dyn RiskService>,
        care: Arc<dyn CareService>,
        recency: Arc<dyn RecencyService>,
    ) -> Self {
        Self {
            risk,
            care,
            recency,
            state: Mutex::new(SessionInner::new()),
        }
    }

    fn lock(&self) -> MedwatchResult<MutexGuard<'_, SessionInner>> {
        self.state.lock().map_err(|e| MedwatchError::StateLock {
            reason: e.to_string(),
        })
    }

    /// Switch the session to `beneficiary`.
    ///
    /// A switch to a different identifier starts a fresh per-identifier
    /// container: all three operation states reset to `Idle` and the
    /// generation advances. In-flight requests for the previous identifier
    /// are NOT cancelled — their resolutions are discarded on arrival
    /// because their generation no longer matches. Setting the identifier
    /// already in place is a no-op.
    pub fn set_identifier(&self, beneficiary: BeneficiaryId) -> MedwatchResult<()> {
        let mut s = self.lock()?;
        if s.beneficiary.as_ref() == Some(&beneficiary) {
            return Ok(());
        }

        s.generation += 1;
        info!(
            beneficiary = %beneficiary,
            generation = s.generation,
            "session switched to new identifier"
        );
        s.beneficiary = Some(beneficiary);
        s.risk = OperationState::Idle;
        s.care = OperationState::Idle;
        s.roi = OperationState::Idle;
        Ok(())
    }

    /// An immutable snapshot of the current session state.
    pub fn snapshot(&self) -> SessionSnapshot {
        let s = self.state.lock().expect("session state lock poisoned");
        SessionSnapshot {
            beneficiary: s.beneficiary.clone(),
            generation: s.generation,
            risk: s.risk.clone(),
            care: s.care.clone(),
            roi: s.roi.clone(),
        }
    }

    /// Run the risk prediction operation for the current identifier.
    ///
    /// # Pipeline
    ///
    /// 1. Boundary checks: an identifier must be set and no risk request
    ///    may already be in flight.
    /// 2. Mark the risk operation `Loading`, tagged with the current
    ///    generation.
    /// 3. Await the service. A resolution whose generation no longer
    ///    matches the session is discarded outright.
    /// 4. On success: store the prediction, mark the ROI stage `Loading`,
    ///    and immediately issue the dependent recency fetch (step 5).
    ///    On failure: store the error message and clear the ROI stage —
    ///    no recency fetch is issued.
    /// 5. Await recency, discard stale resolutions, and store the computed
    ///    `RoiOutcome` (or the recency error) in the ROI stage.
    pub async fn run_risk_prediction(&self) -> MedwatchResult<()> {
        let query = QueryId::new();
        let (beneficiary, generation) = {
            let mut s = self.lock()?;
            let beneficiary = s
                .beneficiary
                .clone()
                .ok_or(MedwatchError::EmptyIdentifier)?;
            if s.risk.is_loading() {
                return Err(MedwatchError::OperationInFlight {
                    operation: ServiceKind::Risk,
                });
            }
            s.risk = OperationState::Loading;
            (beneficiary, s.generation)
        };

        debug!(
            query_id = %query,
            beneficiary = %beneficiary,
            generation,
            "risk prediction request issued"
        );
        let outcome = self.risk.predict(&beneficiary).await;

        let tier = {
            let mut s = self.lock()?;
            if s.generation != generation {
                info!(
                    query_id = %query,
                    issued_generation = generation,
                    current_generation = s.generation,
                    "stale risk resolution discarded"
                );
                return Ok(());
            }
            match outcome {
                Ok(prediction) => {
                    let tier = prediction.tier.clone();
                    s.risk = OperationState::Success(prediction);
                    // Dependent stage opens before the lock drops, so a
                    // snapshot taken between the two awaits sees it pending.
                    s.roi = OperationState::Loading;
                    Some(tier)
                }
                Err(err) => {
                    warn!(query_id = %query, error = %err, "risk prediction failed");
                    s.risk = OperationState::Error(surface_message(&err));
                    s.roi = OperationState::Idle;
                    None
                }
            }
        };

        match tier {
            Some(tier) => self.fetch_recency(beneficiary, generation, tier).await,
            None => Ok(()),
        }
    }

    /// The dependent second stage: recency fetch plus ROI computation.
    ///
    /// Strictly ordered after a successful risk response for the same
    /// triggering action; never issued on its own.
    async fn fetch_recency(
        &self,
        beneficiary: BeneficiaryId,
        generation: u64,
        tier: TierCode,
    ) -> MedwatchResult<()> {
        let query = QueryId::new();
        debug!(
            query_id = %query,
            beneficiary = %beneficiary,
            generation,
            tier = %tier,
            "recency request issued after risk success"
        );
        let outcome = self.recency.recency(&beneficiary).await;

        let mut s = self.lock()?;
        if s.generation != generation {
            info!(
                query_id = %query,
                issued_generation = generation,
                current_generation = s.generation,
                "stale recency resolution discarded"
            );
            return Ok(());
        }
        match outcome {
            Ok(record) => {
                s.roi = OperationState::Success(compute_roi(&record, &tier));
            }
            Err(err) => {
                warn!(query_id = %query, error = %err, "recency fetch failed");
                s.roi = OperationState::Error(surface_message(&err));
            }
        }
        Ok(())
    }

    /// Run the care insight operation for the current identifier.
    ///
    /// Fully independent of the risk pipeline: its failure never blocks a
    /// risk success and vice versa, and the two may resolve in any order.
    pub async fn run_care_insight(&self) -> MedwatchResult<()> {
        let query = QueryId::new();
        let (beneficiary, generation) = {
            let mut s = self.lock()?;
            let beneficiary = s
                .beneficiary
                .clone()
                .ok_or(MedwatchError::EmptyIdentifier)?;
            if s.care.is_loading() {
                return Err(MedwatchError::OperationInFlight {
                    operation: ServiceKind::Care,
                });
            }
            s.care = OperationState::Loading;
            (beneficiary, s.generation)
        };

        debug!(
            query_id = %query,
            beneficiary = %beneficiary,
            generation,
            "care insight request issued"
        );
        let outcome = self.care.insights(&beneficiary).await;

        let mut s = self.lock()?;
        if s.generation != generation {
            info!(
                query_id = %query,
                issued_generation = generation,
                current_generation = s.generation,
                "stale care resolution discarded"
            );
            return Ok(());
        }
        match outcome {
            Ok(insight) => {
                s.care = OperationState::Success(insight);
            }
            Err(err) => {
                warn!(query_id = %query, error = %err, "care insight fetch failed");
                s.care = OperationState::Error(surface_message(&err));
            }
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use medwatch_contracts::{
        care::{CareInsight, CareSuggestion},
        error::{MedwatchError, MedwatchResult, ServiceKind},
        identifier::BeneficiaryId,
        prediction::{PredictionResult, TierCode},
        recency::RecencyRecord,
        roi::RoiOutcome,
    };

    use crate::traits::{CareService, RecencyService, RiskService};

    use super::Aggregator;

    // ── Mock helpers ─────────────────────────────────────────────────────────

    fn bene(id: &str) -> BeneficiaryId {
        BeneficiaryId::new(id).unwrap()
    }

    fn prediction(id: &str, tier: &str) -> PredictionResult {
        PredictionResult {
            beneficiary: bene(id),
            risk_30: 12.0,
            risk_60: 9.0,
            risk_90: 15.0,
            tier: TierCode(tier.to_string()),
            story: "Chronic burden drives the 90-day window.".to_string(),
            recommended: vec!["Care coordinator assignment".to_string()],
            shap_img: None,
        }
    }

    fn insight(id: &str) -> CareInsight {
        CareInsight {
            beneficiary: bene(id),
            diseases: vec!["Diabetes".to_string()],
            suggestions: vec![CareSuggestion {
                disease: "Diabetes".to_string(),
                suggestion: "Schedule quarterly HbA1c checks.".to_string(),
                source_chunks: vec!["chunk".to_string()],
            }],
        }
    }

    /// How a mock service should fail, when it should.
    enum MockFailure {
        /// Application-level `{error}` payload.
        Service(String),
        /// Transport-level connection failure.
        Transport(String),
    }

    /// A risk service that counts calls and can be told to fail, or to
    /// block until released (for in-flight and staleness tests).
    struct MockRisk {
        calls: Arc<Mutex<u32>>,
        failure: Option<MockFailure>,
        gate: Option<Arc<Notify>>,
        tier: String,
    }

    impl MockRisk {
        fn ok(tier: &str) -> Self {
            Self {
                calls: Arc::new(Mutex::new(0)),
                failure: None,
                gate: None,
                tier: tier.to_string(),
            }
        }

        fn failing(failure: MockFailure) -> Self {
            Self {
                calls: Arc::new(Mutex::new(0)),
                failure: Some(failure),
                gate: None,
                tier: "3".to_string(),
            }
        }

        fn gated(tier: &str, gate: Arc<Notify>) -> Self {
            Self {
                calls: Arc::new(Mutex::new(0)),
                failure: None,
                gate: Some(gate),
                tier: tier.to_string(),
            }
        }
    }

    #[async_trait]
    impl RiskService for MockRisk {
        async fn predict(&self, beneficiary: &BeneficiaryId) -> MedwatchResult<PredictionResult> {
            *self.calls.lock().unwrap() += 1;
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match &self.failure {
                Some(MockFailure::Service(message)) => Err(MedwatchError::Service {
                    service: ServiceKind::Risk,
                    message: message.clone(),
                }),
                Some(MockFailure::Transport(reason)) => Err(MedwatchError::Transport {
                    service: ServiceKind::Risk,
                    reason: reason.clone(),
                }),
                None => Ok(prediction(beneficiary.as_str(), &self.tier)),
            }
        }
    }

    struct MockCare {
        error: Option<String>,
    }

    #[async_trait]
    impl CareService for MockCare {
        async fn insights(&self, beneficiary: &BeneficiaryId) -> MedwatchResult<CareInsight> {
            match &self.error {
                Some(message) => Err(MedwatchError::Service {
                    service: ServiceKind::Care,
                    message: message.clone(),
                }),
                None => Ok(insight(beneficiary.as_str())),
            }
        }
    }

    /// A recency service that records how many times it was queried.
    struct MockRecency {
        calls: Arc<Mutex<u32>>,
        cost: Option<f64>,
    }

    impl MockRecency {
        fn with_cost(cost: Option<f64>) -> Self {
            Self {
                calls: Arc::new(Mutex::new(0)),
                cost,
            }
        }
    }

    #[async_trait]
    impl RecencyService for MockRecency {
        async fn recency(&self, beneficiary: &BeneficiaryId) -> MedwatchResult<RecencyRecord> {
            *self.calls.lock().unwrap() += 1;
            Ok(RecencyRecord {
                beneficiary: beneficiary.clone(),
                last_year_total_cost: self.cost,
            })
        }
    }

    fn aggregator(
        risk: MockRisk,
        care: MockCare,
        recency: MockRecency,
    ) -> (Aggregator, Arc<Mutex<u32>>, Arc<Mutex<u32>>) {
        let risk_calls = risk.calls.clone();
        let recency_calls = recency.calls.clone();
        let agg = Aggregator::new(Arc::new(risk), Arc::new(care), Arc::new(recency));
        (agg, risk_calls, recency_calls)
    }

    // ── Test cases ────────────────────────────────────────────────────────────

    /// The full success pipeline: risk resolves, recency follows, and the
    /// ROI stage ends up with a computed estimate.
    #[tokio::test]
    async fn risk_success_triggers_recency_and_roi() {
        let (agg, risk_calls, recency_calls) = aggregator(
            MockRisk::ok("3"),
            MockCare { error: None },
            MockRecency::with_cost(Some(10_000.0)),
        );

        agg.set_identifier(bene("X1")).unwrap();
        agg.run_risk_prediction().await.unwrap();

        assert_eq!(*risk_calls.lock().unwrap(), 1);
        assert_eq!(*recency_calls.lock().unwrap(), 1);

        let snapshot = agg.snapshot();
        let prediction = snapshot.risk.value().expect("risk should be Success");
        assert_eq!(prediction.tier, TierCode("3".into()));

        match snapshot.roi.value() {
            Some(RoiOutcome::Available(est)) => {
                assert_eq!(est.reduction, 0.12);
                assert_eq!(est.proxy_roi, 0.12);
            }
            other => panic!("expected available ROI, got {:?}", other),
        }
    }

    /// Core ordering test: when risk fails with an application error, the
    /// recency fetch is never issued, the risk state carries the backend's
    /// message verbatim, and the ROI stage is cleared.
    #[tokio::test]
    async fn risk_failure_skips_recency_and_clears_roi() {
        let (agg, _, recency_calls) = aggregator(
            MockRisk::failing(MockFailure::Service("not found".to_string())),
            MockCare { error: None },
            MockRecency::with_cost(Some(10_000.0)),
        );

        agg.set_identifier(bene("X1")).unwrap();
        agg.run_risk_prediction().await.unwrap();

        assert_eq!(
            *recency_calls.lock().unwrap(),
            0,
            "recency must never be issued after a risk failure"
        );

        let snapshot = agg.snapshot();
        assert_eq!(snapshot.risk.error(), Some("not found"));
        assert!(snapshot.roi.value().is_none() && snapshot.roi.error().is_none());
    }

    /// Transport failures collapse to the generic connection message.
    #[tokio::test]
    async fn transport_failure_surfaces_generic_message() {
        let (agg, _, _) = aggregator(
            MockRisk::failing(MockFailure::Transport("connection refused".to_string())),
            MockCare { error: None },
            MockRecency::with_cost(None),
        );

        agg.set_identifier(bene("X1")).unwrap();
        agg.run_risk_prediction().await.unwrap();

        assert_eq!(
            agg.snapshot().risk.error(),
            Some("Failed to connect to backend")
        );
    }

    /// The two fan-out operations are independent: care failing does not
    /// block risk succeeding, and both end states coexist.
    #[tokio::test]
    async fn care_failure_does_not_block_risk_success() {
        let (agg, _, _) = aggregator(
            MockRisk::ok("2"),
            MockCare { error: Some("insight backend offline".to_string()) },
            MockRecency::with_cost(Some(500.0)),
        );

        agg.set_identifier(bene("X1")).unwrap();
        agg.run_care_insight().await.unwrap();
        agg.run_risk_prediction().await.unwrap();

        let snapshot = agg.snapshot();
        assert_eq!(snapshot.care.error(), Some("insight backend offline"));
        assert!(snapshot.risk.value().is_some());
        assert!(snapshot.roi.value().is_some());
    }

    /// A zero recency cost produces an Unavailable ROI — a defined result
    /// in the Success state, not an error.
    #[tokio::test]
    async fn zero_cost_recency_yields_unavailable_roi() {
        let (agg, _, _) = aggregator(
            MockRisk::ok("1"),
            MockCare { error: None },
            MockRecency::with_cost(Some(0.0)),
        );

        agg.set_identifier(bene("X1")).unwrap();
        agg.run_risk_prediction().await.unwrap();

        assert_eq!(
            agg.snapshot().roi.value(),
            Some(&RoiOutcome::Unavailable)
        );
    }

    /// Running an operation without an identifier is a boundary violation.
    #[tokio::test]
    async fn run_without_identifier_is_rejected() {
        let (agg, risk_calls, _) = aggregator(
            MockRisk::ok("3"),
            MockCare { error: None },
            MockRecency::with_cost(None),
        );

        assert!(matches!(
            agg.run_risk_prediction().await,
            Err(MedwatchError::EmptyIdentifier)
        ));
        assert_eq!(*risk_calls.lock().unwrap(), 0);
    }

    /// While a risk request is in flight, a second trigger is rejected at
    /// the boundary without reaching the service.
    #[tokio::test]
    async fn retrigger_while_loading_is_rejected() {
        let gate = Arc::new(Notify::new());
        let (agg, risk_calls, _) = aggregator(
            MockRisk::gated("3", gate.clone()),
            MockCare { error: None },
            MockRecency::with_cost(Some(100.0)),
        );
        let agg = Arc::new(agg);

        agg.set_identifier(bene("X1")).unwrap();

        let task = tokio::spawn({
            let agg = Arc::clone(&agg);
            async move { agg.run_risk_prediction().await }
        });
        while !agg.snapshot().risk.is_loading() {
            tokio::task::yield_now().await;
        }

        assert!(matches!(
            agg.run_risk_prediction().await,
            Err(MedwatchError::OperationInFlight { operation: ServiceKind::Risk })
        ));
        // Only the first trigger reached the service.
        assert_eq!(*risk_calls.lock().unwrap(), 1);

        gate.notify_one();
        task.await.unwrap().unwrap();
        assert!(agg.snapshot().risk.value().is_some());
    }

    /// Switching identifiers mid-flight discards the stale resolution:
    /// the new container never sees the old beneficiary's result, and the
    /// dependent recency fetch is never issued for it.
    #[tokio::test]
    async fn stale_resolution_is_discarded_after_identifier_switch() {
        let gate = Arc::new(Notify::new());
        let (agg, _, recency_calls) = aggregator(
            MockRisk::gated("3", gate.clone()),
            MockCare { error: None },
            MockRecency::with_cost(Some(100.0)),
        );
        let agg = Arc::new(agg);

        agg.set_identifier(bene("A1")).unwrap();
        let task = tokio::spawn({
            let agg = Arc::clone(&agg);
            async move { agg.run_risk_prediction().await }
        });
        while !agg.snapshot().risk.is_loading() {
            tokio::task::yield_now().await;
        }

        // The analyst moves on before A1's prediction resolves.
        agg.set_identifier(bene("B2")).unwrap();

        gate.notify_one();
        task.await.unwrap().unwrap();

        let snapshot = agg.snapshot();
        assert!(
            snapshot.risk.value().is_none(),
            "stale resolution must not populate the new container"
        );
        assert_eq!(
            *recency_calls.lock().unwrap(),
            0,
            "no dependent fetch may follow a discarded resolution"
        );
    }

    /// Re-setting the identifier already in place keeps existing results.
    #[tokio::test]
    async fn same_identifier_is_a_no_op() {
        let (agg, _, _) = aggregator(
            MockRisk::ok("3"),
            MockCare { error: None },
            MockRecency::with_cost(Some(100.0)),
        );

        agg.set_identifier(bene("X1")).unwrap();
        agg.run_risk_prediction().await.unwrap();
        let generation = agg.snapshot().generation;

        agg.set_identifier(bene("X1")).unwrap();
        let snapshot = agg.snapshot();
        assert_eq!(snapshot.generation, generation);
        assert!(snapshot.risk.value().is_some());
    }

    /// A new query from a settled state replaces the prior result
    /// wholesale rather than merging into it.
    #[tokio::test]
    async fn rerun_replaces_previous_result() {
        let (agg, risk_calls, recency_calls) = aggregator(
            MockRisk::ok("4"),
            MockCare { error: None },
            MockRecency::with_cost(Some(2_000.0)),
        );

        agg.set_identifier(bene("X1")).unwrap();
        agg.run_risk_prediction().await.unwrap();
        agg.run_risk_prediction().await.unwrap();

        assert_eq!(*risk_calls.lock().unwrap(), 2);
        assert_eq!(*recency_calls.lock().unwrap(), 2);
        assert!(agg.snapshot().risk.value().is_some());
    }
}
