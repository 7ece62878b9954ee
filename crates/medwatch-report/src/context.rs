//! Report context assembly.
//!
//! A `ReportContext` is ephemeral: built from a session snapshot at export
//! time, handed to the synthesizer, and dropped. It is never retained or
//! updated in place.

use chrono::{DateTime, Utc};
use serde::Serialize;

use medwatch_contracts::{
    care::CareInsight,
    error::{MedwatchError, MedwatchResult},
    identifier::BeneficiaryId,
    prediction::PredictionResult,
    roi::RoiEstimate,
};
use medwatch_session::SessionSnapshot;

/// Everything the synthesizer needs to build one patient report.
///
/// Each result slot is filled only when the corresponding operation is in
/// its `Success` state at snapshot time; an unavailable ROI outcome leaves
/// the slot empty as well, since there is no estimate to report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportContext {
    /// The beneficiary the report describes.
    pub beneficiary: BeneficiaryId,
    /// The current risk prediction, when one has resolved.
    pub prediction: Option<PredictionResult>,
    /// The current care insight, when one has resolved.
    pub care: Option<CareInsight>,
    /// The computed ROI estimate, when one is available.
    pub roi: Option<RoiEstimate>,
    /// Fingerprint of the dataset the session was working against.
    pub dataset_fingerprint: Option<String>,
    /// Wall-clock time the context was assembled (UTC).
    pub generated_at: DateTime<Utc>,
}

impl ReportContext {
    /// Assemble a context from the session's current snapshot.
    ///
    /// Fails only when no identifier has been set — a report has to be
    /// about someone. Missing results are not errors; the synthesizer
    /// renders placeholders for them.
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> MedwatchResult<Self> {
        let beneficiary = snapshot
            .beneficiary
            .clone()
            .ok_or(MedwatchError::EmptyIdentifier)?;

        Ok(Self {
            beneficiary,
            prediction: snapshot.risk.value().cloned(),
            care: snapshot.care.value().cloned(),
            roi: snapshot
                .roi
                .value()
                .and_then(|outcome| outcome.estimate().cloned()),
            dataset_fingerprint: None,
            generated_at: Utc::now(),
        })
    }

    /// Attach the dataset fingerprint for the report footer.
    pub fn with_dataset_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.dataset_fingerprint = Some(fingerprint.into());
        self
    }
}
