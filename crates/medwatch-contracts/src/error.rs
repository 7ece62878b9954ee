//! Runtime error types for the medwatch analytics core.
//!
//! All fallible operations across the workspace return `MedwatchResult<T>`.
//! Error variants carry enough context to be surfaced to the analyst as-is:
//! transport failures keep the generic "failed to connect" surface, while
//! application-level service errors carry the backend's message verbatim.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which backend service (or the operation it backs) an error belongs to.
///
/// Doubles as the per-operation label in the session state machine — risk,
/// care, and recency each have their own independent lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceKind {
    /// Risk scoring service (30/60/90-day windows + tier).
    Risk,
    /// Care insight service (detected conditions + suggestions).
    Care,
    /// Recency service (last-year total cost).
    Recency,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServiceKind::Risk => "risk prediction",
            ServiceKind::Care => "care insight",
            ServiceKind::Recency => "recency",
        };
        f.write_str(name)
    }
}

/// The unified error type for the medwatch workspace.
#[derive(Debug, Error)]
pub enum MedwatchError {
    /// The service could not be reached at the transport level.
    ///
    /// Surfaced to the analyst as a generic connection failure; the
    /// underlying reason is retained for logs only.
    #[error("failed to connect to the {service} service: {reason}")]
    Transport { service: ServiceKind, reason: String },

    /// A well-formed response carried an application-level `error` field.
    ///
    /// The message is the backend's own text, surfaced verbatim.
    #[error("{service} service error: {message}")]
    Service { service: ServiceKind, message: String },

    /// The dataset source was malformed or unreadable.
    ///
    /// Fatal to the listing — no partial dataset is ever exposed.
    #[error("dataset parse failed: {reason}")]
    DatasetParse { reason: String },

    /// A lookup was attempted with an empty beneficiary identifier.
    #[error("beneficiary identifier must not be empty")]
    EmptyIdentifier,

    /// A second request for the same operation was issued while one is
    /// still in flight. At most one in-flight request per operation.
    #[error("a {operation} request is already in flight")]
    OperationInFlight { operation: ServiceKind },

    /// A page number outside `[1, total_pages]` was requested.
    #[error("page {page} is out of range (valid pages: 1..={total_pages})")]
    PageOutOfRange { page: usize, total_pages: usize },

    /// A service response failed JSON Schema validation at the boundary.
    #[error("{service} response failed schema validation: {reason}")]
    SchemaValidation { service: ServiceKind, reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// Report synthesis or serialization failed.
    #[error("report generation failed: {reason}")]
    Report { reason: String },

    /// The session state mutex was poisoned by a panicking holder.
    #[error("session state lock poisoned: {reason}")]
    StateLock { reason: String },
}

/// Convenience alias used throughout the medwatch crates.
pub type MedwatchResult<T> = Result<T, MedwatchError>;
