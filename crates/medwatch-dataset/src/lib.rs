//! # medwatch-dataset
//!
//! The tabular patient data store: ingests a delimited dataset with a
//! fixed required column set, caps it at the first 10,000 rows, and
//! serves identifier search and fixed-size pagination over the result.
//!
//! The store is read-only after load and independent of the prediction
//! services — it is queried directly by the analyst's search and paging
//! actions.

pub mod columns;
pub mod load;
pub mod page;

pub use columns::{display_value, is_flag_column, FLAG_COLUMNS, IDENTIFIER_COLUMN, REQUIRED_COLUMNS};
pub use load::{Dataset, RECORD_CAP};
pub use page::{paginate, Page};
