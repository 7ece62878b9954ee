//! # medwatch-roi
//!
//! Deterministic proxy ROI derivation from a recency cost figure and a
//! risk tier. No I/O, no state — a single pure function over contract
//! types.

pub mod engine;

pub use engine::compute_roi;
