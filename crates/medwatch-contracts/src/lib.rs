//! # medwatch-contracts
//!
//! Shared types, wire schemas, and error contracts for the medwatch
//! analytics core.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions, wire envelopes, and error types.

pub mod care;
pub mod error;
pub mod identifier;
pub mod patient;
pub mod prediction;
pub mod recency;
pub mod roi;
pub mod wire;
