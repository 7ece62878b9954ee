//! reqwest-backed implementations of the service traits.
//!
//! Error mapping follows the session taxonomy:
//!
//! - request or body failures at the transport level → `Transport`
//!   (surfaced generically as a connection failure)
//! - a non-2xx status → `Service` with the body's `error` text verbatim,
//!   or the endpoint's fixed fallback text when the field is absent
//! - a 2xx body is schema-validated, then decoded through its envelope;
//!   an `{error}` body inside a 2xx still resolves to `Service`
//!
//! No request is retried, and no timeout is imposed here.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use medwatch_contracts::{
    care::CareInsight,
    error::{MedwatchError, MedwatchResult, ServiceKind},
    identifier::BeneficiaryId,
    prediction::PredictionResult,
    recency::RecencyRecord,
    wire::{CareResponse, RecencyResponse, RiskRequest, RiskResponse},
};
use medwatch_session::traits::{CareService, RecencyService, RiskService};

use crate::{config::ServiceEndpoints, schema::validate_response};

fn transport(service: ServiceKind, err: reqwest::Error) -> MedwatchError {
    MedwatchError::Transport {
        service,
        reason: err.to_string(),
    }
}

/// Fixed fallback text used when an error response has no `error` field.
fn fallback_message(service: ServiceKind) -> &'static str {
    match service {
        ServiceKind::Risk => "Prediction failed",
        ServiceKind::Care => "Failed to retrieve insights",
        ServiceKind::Recency => "Failed to retrieve recency cost",
    }
}

/// Build the `Service` error for a non-2xx response body.
fn status_failure(service: ServiceKind, payload: &Value) -> MedwatchError {
    let message = payload
        .get("error")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| fallback_message(service).to_string());
    MedwatchError::Service { service, message }
}

fn decode_failure(service: ServiceKind, err: serde_json::Error) -> MedwatchError {
    MedwatchError::SchemaValidation {
        service,
        reason: format!("envelope decode failed: {}", err),
    }
}

// ── Risk ──────────────────────────────────────────────────────────────────────

/// HTTP client for the risk scoring service.
pub struct HttpRiskService {
    client: reqwest::Client,
    url: String,
}

impl HttpRiskService {
    /// Build a client POSTing to the configured risk URL.
    pub fn new(client: reqwest::Client, endpoints: &ServiceEndpoints) -> Self {
        Self {
            client,
            url: endpoints.risk_url.clone(),
        }
    }
}

#[async_trait]
impl RiskService for HttpRiskService {
    async fn predict(&self, beneficiary: &BeneficiaryId) -> MedwatchResult<PredictionResult> {
        debug!(url = %self.url, beneficiary = %beneficiary, "POST risk prediction");
        let response = self
            .client
            .post(&self.url)
            .json(&RiskRequest::new(beneficiary))
            .send()
            .await
            .map_err(|e| transport(ServiceKind::Risk, e))?;

        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .map_err(|e| transport(ServiceKind::Risk, e))?;

        if !status.is_success() {
            return Err(status_failure(ServiceKind::Risk, &payload));
        }

        validate_response(ServiceKind::Risk, &payload)?;
        let envelope: RiskResponse =
            serde_json::from_value(payload).map_err(|e| decode_failure(ServiceKind::Risk, e))?;
        envelope.into_domain(beneficiary.clone())
    }
}

// ── Care ──────────────────────────────────────────────────────────────────────

/// HTTP client for the care insight service.
pub struct HttpCareService {
    client: reqwest::Client,
    endpoints: ServiceEndpoints,
}

impl HttpCareService {
    /// Build a client GETting `/patient/{id}` under the care base URL.
    pub fn new(client: reqwest::Client, endpoints: &ServiceEndpoints) -> Self {
        Self {
            client,
            endpoints: endpoints.clone(),
        }
    }
}

#[async_trait]
impl CareService for HttpCareService {
    async fn insights(&self, beneficiary: &BeneficiaryId) -> MedwatchResult<CareInsight> {
        let url = self.endpoints.care_patient_url(beneficiary.as_str());
        debug!(url = %url, "GET care insight");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport(ServiceKind::Care, e))?;

        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .map_err(|e| transport(ServiceKind::Care, e))?;

        if !status.is_success() {
            return Err(status_failure(ServiceKind::Care, &payload));
        }

        validate_response(ServiceKind::Care, &payload)?;
        let envelope: CareResponse =
            serde_json::from_value(payload).map_err(|e| decode_failure(ServiceKind::Care, e))?;
        envelope.into_domain(beneficiary.clone())
    }
}

// ── Recency ───────────────────────────────────────────────────────────────────

/// HTTP client for the recency cost service.
pub struct HttpRecencyService {
    client: reqwest::Client,
    endpoints: ServiceEndpoints,
}

impl HttpRecencyService {
    /// Build a client GETting `/recency/{id}` under the recency base URL.
    pub fn new(client: reqwest::Client, endpoints: &ServiceEndpoints) -> Self {
        Self {
            client,
            endpoints: endpoints.clone(),
        }
    }
}

#[async_trait]
impl RecencyService for HttpRecencyService {
    async fn recency(&self, beneficiary: &BeneficiaryId) -> MedwatchResult<RecencyRecord> {
        let url = self.endpoints.recency_patient_url(beneficiary.as_str());
        debug!(url = %url, "GET recency cost");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport(ServiceKind::Recency, e))?;

        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .map_err(|e| transport(ServiceKind::Recency, e))?;

        if !status.is_success() {
            return Err(status_failure(ServiceKind::Recency, &payload));
        }

        validate_response(ServiceKind::Recency, &payload)?;
        let envelope: RecencyResponse = serde_json::from_value(payload)
            .map_err(|e| decode_failure(ServiceKind::Recency, e))?;
        envelope.into_domain(beneficiary.clone())
    }
}
