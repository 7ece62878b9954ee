//! Column definitions for the beneficiary dataset.
//!
//! The column set is fixed: a load fails outright when any required column
//! is missing from the header row. Chronic condition flags are stored raw
//! (`"1"` / other) and translated to "Yes"/"No" only at render time.

/// The unique identifier column.
pub const IDENTIFIER_COLUMN: &str = "DESYNPUF_ID";

/// Every column a loadable dataset must carry, in display order.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "DESYNPUF_ID",
    "SP_ALZHDMTA",
    "SP_CHF",
    "SP_CHRNKIDN",
    "SP_CNCR",
    "SP_COPD",
    "SP_DEPRESSN",
    "SP_DIABETES",
    "SP_ISCHMCHT",
    "SP_OSTEOPRS",
    "SP_RA_OA",
    "SP_STRKETIA",
    "chronic_count_2008",
    "chronic_count_2009",
    "chronic_count_2010",
    "total_visits",
    "total_amount",
    "avg_claim_amount",
];

/// The chronic condition flag columns (the boolean subset of
/// `REQUIRED_COLUMNS`).
pub const FLAG_COLUMNS: &[&str] = &[
    "SP_ALZHDMTA",
    "SP_CHF",
    "SP_CHRNKIDN",
    "SP_CNCR",
    "SP_COPD",
    "SP_DEPRESSN",
    "SP_DIABETES",
    "SP_ISCHMCHT",
    "SP_OSTEOPRS",
    "SP_RA_OA",
    "SP_STRKETIA",
];

/// True when `column` is a chronic condition flag.
pub fn is_flag_column(column: &str) -> bool {
    FLAG_COLUMNS.contains(&column)
}

/// Render a stored value for display.
///
/// Flag columns render `"1"` as "Yes" and anything else as "No"; all other
/// columns pass through unchanged. The stored value is never mutated.
pub fn display_value<'a>(column: &str, raw: &'a str) -> &'a str {
    if is_flag_column(column) {
        if raw == "1" {
            "Yes"
        } else {
            "No"
        }
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_columns_are_a_subset_of_required() {
        for flag in FLAG_COLUMNS {
            assert!(REQUIRED_COLUMNS.contains(flag), "{flag} missing from required set");
        }
    }

    #[test]
    fn flag_values_render_yes_no() {
        assert_eq!(display_value("SP_DIABETES", "1"), "Yes");
        assert_eq!(display_value("SP_DIABETES", "0"), "No");
        assert_eq!(display_value("SP_DIABETES", "2"), "No");
        assert_eq!(display_value("SP_DIABETES", ""), "No");
    }

    #[test]
    fn non_flag_values_pass_through() {
        assert_eq!(display_value("total_amount", "1"), "1");
        assert_eq!(display_value("DESYNPUF_ID", "0043E27DA2B94535"), "0043E27DA2B94535");
    }
}
