//! # medwatch-services
//!
//! Boundary implementations of the session service traits: TOML endpoint
//! configuration, per-endpoint JSON Schema validation of raw response
//! bodies, and reqwest HTTP clients for the risk, care, and recency
//! backends.

pub mod config;
pub mod http;
pub mod schema;

pub use config::ServiceEndpoints;
pub use http::{HttpCareService, HttpRecencyService, HttpRiskService};
pub use schema::{response_schema, validate_response};
