//! Per-identifier session state.
//!
//! Each of the three operations (risk, care, recency/ROI) runs its own
//! independent `Idle → Loading → Success | Error` lifecycle. The session
//! container tracks a generation counter that advances on every identifier
//! switch; resolutions tagged with an older generation are discarded
//! without touching state.

use serde::Serialize;

use medwatch_contracts::{
    care::CareInsight, identifier::BeneficiaryId, prediction::PredictionResult, roi::RoiOutcome,
};

/// Lifecycle of one asynchronous operation.
///
/// A new request from `Success` or `Error` passes through `Loading` again;
/// while `Loading`, re-triggering the same operation is rejected at the
/// boundary, so at most one request per operation is ever in flight.
#[derive(Debug, Clone, Serialize)]
pub enum OperationState<T> {
    /// No request has been issued for the current identifier.
    Idle,
    /// A request is in flight.
    Loading,
    /// The most recent request resolved with a result.
    Success(T),
    /// The most recent request failed; the message is analyst-facing.
    Error(String),
}

impl<T> OperationState<T> {
    /// True while a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, OperationState::Loading)
    }

    /// The successful result, when present.
    pub fn value(&self) -> Option<&T> {
        match self {
            OperationState::Success(value) => Some(value),
            _ => None,
        }
    }

    /// The failure message, when present.
    pub fn error(&self) -> Option<&str> {
        match self {
            OperationState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// The mutable interior of a session — one container per identifier.
///
/// Only the aggregator mutates this, always behind its mutex and never
/// across an await point. Switching identifiers replaces the container
/// contents wholesale and advances the generation; in-flight requests for
/// the previous identifier are not cancelled, their resolutions are
/// discarded on arrival.
#[derive(Debug)]
pub(crate) struct SessionInner {
    /// The identifier the container currently belongs to.
    pub(crate) beneficiary: Option<BeneficiaryId>,
    /// Advances on every identifier switch; requests carry the value they
    /// were issued under.
    pub(crate) generation: u64,
    pub(crate) risk: OperationState<PredictionResult>,
    pub(crate) care: OperationState<CareInsight>,
    /// The recency/ROI stage: `Loading` from risk success until the
    /// dependent fetch resolves, then the computed outcome or an error.
    pub(crate) roi: OperationState<RoiOutcome>,
}

impl SessionInner {
    pub(crate) fn new() -> Self {
        Self {
            beneficiary: None,
            generation: 0,
            risk: OperationState::Idle,
            care: OperationState::Idle,
            roi: OperationState::Idle,
        }
    }
}

/// An immutable view of the session at one point in time.
///
/// This is what the report synthesizer reads — it can never observe a
/// half-applied resolution, because snapshots are cloned under the same
/// lock that guards every state write.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    /// The identifier the snapshot belongs to, when one has been set.
    pub beneficiary: Option<BeneficiaryId>,
    /// The generation the snapshot was taken at.
    pub generation: u64,
    /// Risk prediction operation state.
    pub risk: OperationState<PredictionResult>,
    /// Care insight operation state.
    pub care: OperationState<CareInsight>,
    /// Recency/ROI pipeline state.
    pub roi: OperationState<RoiOutcome>,
}
