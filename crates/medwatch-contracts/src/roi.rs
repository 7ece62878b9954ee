//! Proxy ROI estimate types.
//!
//! An `RoiEstimate` is derived, never independently persisted. It exists
//! only inside a session snapshot and the report context built from it.

use serde::{Deserialize, Serialize};

use crate::prediction::TierCode;

/// A computed proxy return-on-investment figure.
///
/// `last_year_expense` and `last_year_total_spend` are kept as distinct
/// fields even though the recency feed currently populates both from the
/// same `LAST_YEAR_TOTAL_COST` figure, which makes `proxy_roi` equal to
/// `reduction` on every observed input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiEstimate {
    /// Last-year expense used as the savings numerator base.
    pub last_year_expense: f64,
    /// Last-year total spend used as the denominator.
    pub last_year_total_spend: f64,
    /// The tier the reduction fraction was taken from.
    pub tier: TierCode,
    /// Reduction fraction applied for the tier.
    pub reduction: f64,
    /// Dimensionless proxy ROI: `expense * reduction / spend`.
    pub proxy_roi: f64,
}

/// The outcome of an ROI computation.
///
/// `Unavailable` is a defined result, not an error: it means the recency
/// cost was absent or zero, or no tier is known yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoiOutcome {
    /// ROI preconditions held; the estimate is populated.
    Available(RoiEstimate),
    /// ROI preconditions failed; no estimate exists.
    Unavailable,
}

impl RoiOutcome {
    /// The estimate, when available.
    pub fn estimate(&self) -> Option<&RoiEstimate> {
        match self {
            RoiOutcome::Available(est) => Some(est),
            RoiOutcome::Unavailable => None,
        }
    }

    /// True when an estimate was produced.
    pub fn is_available(&self) -> bool {
        matches!(self, RoiOutcome::Available(_))
    }
}
