//! The proxy ROI computation.
//!
//! Pure and deterministic: the same recency record and tier always produce
//! the same outcome. Preconditions that fail yield `RoiOutcome::Unavailable`
//! — never an error.

use tracing::debug;

use medwatch_contracts::{
    prediction::TierCode,
    recency::RecencyRecord,
    roi::{RoiEstimate, RoiOutcome},
};

/// Derive the proxy ROI for `recency` under `tier`.
///
/// The reduction fraction comes from the fixed tier table (unknown tiers
/// reduce by zero, which still yields an available estimate). A missing or
/// zero last-year cost makes the result `Unavailable`.
///
/// Expense and total spend are carried as separate fields in the estimate,
/// but the recency feed populates both from `last_year_total_cost`, so the
/// division `expense * reduction / spend` resolves to `reduction` on every
/// input seen today.
pub fn compute_roi(recency: &RecencyRecord, tier: &TierCode) -> RoiOutcome {
    let reduction = tier.reduction_fraction();

    let cost = match recency.last_year_total_cost {
        Some(cost) if cost != 0.0 => cost,
        _ => {
            debug!(
                beneficiary = %recency.beneficiary,
                tier = %tier,
                "recency cost absent or zero; ROI unavailable"
            );
            return RoiOutcome::Unavailable;
        }
    };

    let last_year_expense = cost;
    let last_year_total_spend = cost;
    let proxy_roi = last_year_expense * reduction / last_year_total_spend;

    RoiOutcome::Available(RoiEstimate {
        last_year_expense,
        last_year_total_spend,
        tier: tier.clone(),
        reduction,
        proxy_roi,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use medwatch_contracts::identifier::BeneficiaryId;

    fn recency(cost: Option<f64>) -> RecencyRecord {
        RecencyRecord {
            beneficiary: BeneficiaryId::new("X1").unwrap(),
            last_year_total_cost: cost,
        }
    }

    #[test]
    fn tier_three_with_ten_thousand_cost() {
        let outcome = compute_roi(&recency(Some(10_000.0)), &TierCode("3".into()));
        let est = outcome.estimate().expect("ROI should be available");
        assert_eq!(est.reduction, 0.12);
        assert_eq!(est.proxy_roi, 0.12);
        assert_eq!(est.last_year_expense, 10_000.0);
        assert_eq!(est.last_year_total_spend, 10_000.0);
    }

    #[test]
    fn zero_cost_is_unavailable_for_every_tier() {
        for code in ["1", "2", "3", "4", "5", "9"] {
            let outcome = compute_roi(&recency(Some(0.0)), &TierCode(code.into()));
            assert_eq!(outcome, RoiOutcome::Unavailable, "tier {code}");
        }
    }

    #[test]
    fn absent_cost_is_unavailable() {
        let outcome = compute_roi(&recency(None), &TierCode("1".into()));
        assert_eq!(outcome, RoiOutcome::Unavailable);
    }

    #[test]
    fn unknown_tier_with_nonzero_cost_is_available_at_zero() {
        // An unrecognized tier is not an error: the reduction is zero and
        // the estimate is still produced.
        let outcome = compute_roi(&recency(Some(5_000.0)), &TierCode("9".into()));
        let est = outcome.estimate().expect("ROI should be available");
        assert_eq!(est.reduction, 0.0);
        assert_eq!(est.proxy_roi, 0.0);
    }

    #[test]
    fn proxy_roi_equals_reduction_for_shared_cost_field() {
        // Both sides of the division read the same recency figure, so the
        // proxy collapses to the reduction fraction for any nonzero cost.
        for (code, expected) in [("1", 0.25), ("2", 0.18), ("4", 0.07), ("5", 0.03)] {
            let outcome = compute_roi(&recency(Some(123_456.78)), &TierCode(code.into()));
            let est = outcome.estimate().unwrap();
            assert!((est.proxy_roi - expected).abs() < 1e-12, "tier {code}");
        }
    }
}
