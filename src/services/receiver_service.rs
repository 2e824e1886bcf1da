use crate::config::ReceiverConfig;
use crate::domain::payload::{Acknowledgement, CanonicalPayload};
use crate::domain::profile::MappingProfile;
use crate::domain::submission::{StoredSubmission, SubmissionId};
use crate::services::codec;
use crate::services::validator::Validator;
use opentelemetry::{KeyValue, global, metrics::Counter};
use rand::Rng;
use reqwest::StatusCode;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::RwLock;

#[derive(Clone, Debug)]
struct Metrics {
    submissions_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("incident-relay");
        Self {
            submissions_total: meter
                .u64_counter("incident_receiver_submissions_total")
                .with_description("Submissions seen by the mock receiver, by outcome")
                .build(),
        }
    }
}

/// Outcome of one `MockReceiver::receive` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverReply {
    pub accepted: bool,
    pub body: String,
}

impl ReceiverReply {
    /// HTTP status the reply is served with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        if self.accepted { StatusCode::CREATED } else { StatusCode::BAD_REQUEST }
    }

    fn rejected(message: impl Into<String>, errors: Vec<String>) -> Self {
        let ack = Acknowledgement::rejected(message, errors);
        Self { accepted: false, body: serde_json::to_string(&ack).unwrap_or_default() }
    }
}

/// Stand-in for the incident-tracking API: re-validates what it receives and
/// keeps every accepted submission for its lifetime.
#[derive(Debug)]
pub struct MockReceiver {
    validator: Validator,
    store: RwLock<Vec<StoredSubmission>>,
    metrics: Metrics,
}

impl MockReceiver {
    #[must_use]
    pub fn new(validator: Validator) -> Self {
        Self { validator, store: RwLock::new(Vec::new()), metrics: Metrics::new() }
    }

    #[must_use]
    pub fn from_config(config: &ReceiverConfig) -> Self {
        Self::new(Validator::new(MappingProfile::from(config.profile), config.email_policy()))
    }

    #[must_use]
    pub const fn profile(&self) -> &MappingProfile {
        self.validator.profile()
    }

    /// Deserializes, validates and stores one payload.
    #[tracing::instrument(skip(self, payload), fields(payload_len = payload.len()))]
    pub async fn receive(&self, payload: &str) -> ReceiverReply {
        let mut payload: CanonicalPayload = match serde_json::from_str(payload) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!(error = %e, "Undecodable payload");
                self.record("invalid_payload");
                return ReceiverReply::rejected("Invalid JSON payload received", Vec::new());
            }
        };

        let outcome = self.validator.validate_payload(&payload);
        if !outcome.is_valid() {
            tracing::debug!(errors = %outcome.joined(), "Payload rejected");
            self.record("rejected");
            return ReceiverReply::rejected(format!("Validation failed: {}", outcome.joined()), outcome.into_errors());
        }

        let received_at = OffsetDateTime::now_utc();
        let stamp = codec::format_timestamp(received_at);
        if let Some(field) = self.profile().timestamp_field() {
            payload.set_text(field, stamp.clone());
        }

        let mut store = self.store.write().await;
        let id = SubmissionId::new(received_at.date(), store.len() as u64 + 1);
        let ack = Acknowledgement {
            success: true,
            message: Some("Incident submitted successfully".to_string()),
            incident_id: id.to_string(),
            errors: Vec::new(),
            received_fields: Some(payload.clone()),
            timestamp: Some(stamp),
        };
        let body = match serde_json::to_string(&ack) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode acknowledgement");
                self.record("error");
                return ReceiverReply::rejected(format!("Server error: {e}"), Vec::new());
            }
        };
        store.push(StoredSubmission { id: id.clone(), received_at, payload });
        drop(store);

        tracing::info!(submission_id = %id, "Submission accepted");
        self.record("accepted");
        ReceiverReply { accepted: true, body }
    }

    /// Number of accepted submissions.
    pub async fn count(&self) -> usize {
        self.store.read().await.len()
    }

    /// Copy of every accepted submission, oldest first.
    pub async fn submissions(&self) -> Vec<StoredSubmission> {
        self.store.read().await.clone()
    }

    fn record(&self, status: &'static str) {
        self.metrics.submissions_total.add(1, &[KeyValue::new("status", status)]);
    }
}

/// Simulated latency and random outages in front of a receiver.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FaultInjector {
    latency: Duration,
    failure_probability: f64,
}

impl FaultInjector {
    /// `failure_probability` is clamped to `0.0..=1.0`; NaN disables faults.
    #[must_use]
    pub fn new(latency: Duration, failure_probability: f64) -> Self {
        let failure_probability = if failure_probability.is_nan() { 0.0 } else { failure_probability.clamp(0.0, 1.0) };
        Self { latency, failure_probability }
    }

    #[must_use]
    pub fn from_config(config: &ReceiverConfig) -> Self {
        Self::new(config.latency(), config.failure_probability)
    }

    pub async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Draws whether this request suffers a synthetic outage.
    #[must_use]
    pub fn trips(&self) -> bool {
        self.failure_probability > 0.0 && rand::thread_rng().gen_bool(self.failure_probability)
    }
}
