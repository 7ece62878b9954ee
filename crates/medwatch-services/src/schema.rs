//! Per-endpoint JSON Schema validation.
//!
//! Every raw response body is validated against its endpoint's schema
//! before typed decoding. Each schema admits both the success shape and
//! the `{error}` failure shape — the envelope decides which one applies.
//! All violations are collected into one `SchemaValidation` error so the
//! full failure set is visible in a single pass.

use serde_json::{json, Value};
use tracing::warn;

use medwatch_contracts::error::{MedwatchError, MedwatchResult, ServiceKind};

/// The `{error}` failure shape shared by every endpoint.
fn failure_schema() -> Value {
    json!({
        "type": "object",
        "required": ["error"],
        "properties": { "error": { "type": "string" } }
    })
}

/// The response schema for `service`.
pub fn response_schema(service: ServiceKind) -> Value {
    let success = match service {
        ServiceKind::Risk => json!({
            "type": "object",
            "required": ["Risk_30", "Risk_60", "Risk_90", "Tier", "story"],
            "properties": {
                "Risk_30": { "type": "number" },
                "Risk_60": { "type": "number" },
                "Risk_90": { "type": "number" },
                "Tier": { "type": ["integer", "string"] },
                "story": { "type": "string" },
                "recommended": { "type": "array", "items": { "type": "string" } },
                "shap_img": { "type": ["string", "null"] }
            }
        }),
        ServiceKind::Care => json!({
            "type": "object",
            "properties": {
                "patient_id": { "type": ["string", "null"] },
                "diseases": { "type": "array", "items": { "type": "string" } },
                "suggestions": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "required": ["disease", "suggestion", "source_chunks"],
                        "properties": {
                            "disease": { "type": "string" },
                            "suggestion": { "type": "string" },
                            "source_chunks": {
                                "type": "array",
                                "items": { "type": "string" }
                            }
                        }
                    }
                }
            },
            "not": { "required": ["error"] }
        }),
        ServiceKind::Recency => json!({
            "type": "object",
            "properties": {
                "LAST_YEAR_TOTAL_COST": { "type": ["number", "null"] }
            },
            "not": { "required": ["error"] }
        }),
    };

    json!({ "anyOf": [failure_schema(), success] })
}

/// Validate a raw response body against its endpoint schema.
///
/// Returns `MedwatchError::SchemaValidation` carrying every violation when
/// the body matches neither the success nor the failure shape.
pub fn validate_response(service: ServiceKind, payload: &Value) -> MedwatchResult<()> {
    let schema = response_schema(service);
    let validator =
        jsonschema::validator_for(&schema).map_err(|e| MedwatchError::SchemaValidation {
            service,
            reason: format!("invalid schema document: {}", e),
        })?;

    let failures: Vec<String> = validator
        .iter_errors(payload)
        .map(|error| format!("{} at {}", error, error.instance_path))
        .collect();

    if failures.is_empty() {
        return Ok(());
    }

    let reason = failures.join("; ");
    warn!(service = %service, %reason, "response failed schema validation");
    Err(MedwatchError::SchemaValidation { service, reason })
}
