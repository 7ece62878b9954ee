//! # medwatch-session
//!
//! The prediction result aggregator: per-identifier session state, the
//! three service trait seams, and the driver that fans out to risk and
//! care independently and chains recency → ROI behind a successful risk
//! response.
//!
//! Everything here runs in one cooperative scheduling context — concurrent
//! logical operations interleave, they do not run in parallel. The report
//! layer reads immutable snapshots only.

pub mod aggregator;
pub mod state;
pub mod traits;

pub use aggregator::Aggregator;
pub use state::{OperationState, SessionSnapshot};
pub use traits::{CareService, RecencyService, RiskService};
