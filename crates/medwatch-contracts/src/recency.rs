//! Recency cost domain type.

use serde::{Deserialize, Serialize};

use crate::identifier::BeneficiaryId;

/// Last-year total cost for one beneficiary.
///
/// The cost may be absent or zero — both disqualify the ROI computation
/// rather than producing an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecencyRecord {
    /// The beneficiary this cost figure belongs to.
    pub beneficiary: BeneficiaryId,
    /// Total cost over the trailing year, when known.
    pub last_year_total_cost: Option<f64>,
}
