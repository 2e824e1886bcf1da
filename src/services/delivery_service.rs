use crate::config::DeliveryConfig;
use crate::domain::delivery::DeliveryResult;
use crate::domain::email::EmailPolicy;
use crate::domain::form::FormRecord;
use crate::domain::payload::Acknowledgement;
use crate::domain::profile::MappingProfile;
use crate::error::DeliveryError;
use crate::services::mapper::SchemaMapper;
use crate::services::transport::{Transport, TransportError, TransportResponse, is_transient_status};
use crate::services::validator::Validator;
use backon::{ExponentialBuilder, Retryable};
use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Clone, Debug)]
struct Metrics {
    submissions_total: Counter<u64>,
    attempts: Histogram<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("incident-relay");
        Self {
            submissions_total: meter
                .u64_counter("incident_submissions_total")
                .with_description("Submissions handled by the delivery client, by outcome")
                .build(),
            attempts: meter
                .u64_histogram("incident_delivery_attempts")
                .with_description("Transport calls made per submission")
                .build(),
        }
    }
}

/// Transport calls made and delays slept for one submission.
#[derive(Debug, Default)]
struct AttemptLog {
    attempts: u32,
    backoff: Vec<Duration>,
}

#[derive(Debug)]
struct Accepted {
    message: String,
    submission_id: String,
}

/// Validates, maps and delivers incident reports.
///
/// Every path through `submit` ends in a `DeliveryResult`; nothing is
/// propagated to the caller as an error.
#[derive(Clone, Debug)]
pub struct DeliveryClient {
    mapper: SchemaMapper,
    validator: Validator,
    transport: Arc<dyn Transport>,
    fallback: Option<Arc<dyn Transport>>,
    config: DeliveryConfig,
    metrics: Metrics,
}

impl DeliveryClient {
    #[must_use]
    pub fn new(profile: MappingProfile, transport: Arc<dyn Transport>, config: DeliveryConfig) -> Self {
        Self {
            mapper: SchemaMapper::new(profile.clone()),
            validator: Validator::new(profile, EmailPolicy::default()),
            transport,
            fallback: None,
            config,
            metrics: Metrics::new(),
        }
    }

    #[must_use]
    pub fn with_email_policy(mut self, policy: EmailPolicy) -> Self {
        self.validator = Validator::new(self.mapper.profile().clone(), policy);
        self
    }

    /// Transport used when the primary one ends unreachable. Only consulted
    /// when `fallback_to_mock` is enabled in the configuration.
    #[must_use]
    pub fn with_fallback(mut self, fallback: Arc<dyn Transport>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Pretty-printed wire payload for `form`, without sending anything.
    #[must_use]
    pub fn preview(&self, form: &FormRecord) -> String {
        let payload = self.mapper.to_canonical(form);
        serde_json::to_string_pretty(&payload).unwrap_or_else(|e| format!("Error transforming data: {e}"))
    }

    /// Submits one incident report.
    pub async fn submit(&self, form: &FormRecord) -> DeliveryResult {
        self.submit_with_cancel(form, CancellationToken::new()).await
    }

    /// Submits one incident report, abandoning delivery as soon as `cancel`
    /// fires or the configured deadline passes. The deadline covers the
    /// fallback transport too.
    #[tracing::instrument(skip_all, fields(title = %form.title))]
    pub async fn submit_with_cancel(&self, form: &FormRecord, cancel: CancellationToken) -> DeliveryResult {
        tracing::info!("Starting incident submission");

        let deadline = Instant::now() + self.config.request_timeout();
        let result = match self.prepare(form) {
            Ok(body) => {
                let mut log = AttemptLog::default();
                let outcome = self.deliver_with_fallback(&body, deadline, &cancel, &mut log).await;
                match outcome {
                    Ok(accepted) => {
                        DeliveryResult::succeeded(accepted.message, accepted.submission_id, log.attempts, log.backoff)
                    }
                    Err(e) => DeliveryResult::failed(e, log.attempts, log.backoff),
                }
            }
            Err(e) => DeliveryResult::failed(e, 0, Vec::new()),
        };

        self.record(&result);
        result
    }

    /// Validating and Mapping: runs both validation passes and serializes.
    fn prepare(&self, form: &FormRecord) -> Result<String, DeliveryError> {
        let outcome = self.validator.validate_form(form);
        if !outcome.is_valid() {
            return Err(DeliveryError::FormInvalid(outcome.into_errors()));
        }

        let payload = self.mapper.to_canonical(form);
        let outcome = self.validator.validate_payload(&payload);
        if !outcome.is_valid() {
            return Err(DeliveryError::PayloadInvalid(outcome.into_errors()));
        }

        let body = serde_json::to_string(&payload)
            .map_err(|e| DeliveryError::PayloadInvalid(vec![format!("Payload could not be encoded: {e}")]))?;
        tracing::debug!(payload = %body, "Form data transformed to wire format");
        Ok(body)
    }

    async fn deliver_with_fallback(
        &self,
        body: &str,
        deadline: Instant,
        cancel: &CancellationToken,
        log: &mut AttemptLog,
    ) -> Result<Accepted, DeliveryError> {
        let outcome = self.deliver(self.transport.as_ref(), body, deadline, cancel, log).await;
        match (outcome, &self.fallback) {
            (Err(DeliveryError::NetworkUnreachable(reason)), Some(fallback)) if self.config.fallback_to_mock => {
                tracing::warn!(reason = %reason, "Primary target unreachable, delivering to fallback");
                self.deliver(fallback.as_ref(), body, deadline, cancel, log).await
            }
            (outcome, _) => outcome,
        }
    }

    /// Sending and Interpreting, bounded by the deadline and the cancel token.
    async fn deliver(
        &self,
        transport: &dyn Transport,
        body: &str,
        deadline: Instant,
        cancel: &CancellationToken,
        log: &mut AttemptLog,
    ) -> Result<Accepted, DeliveryError> {
        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::warn!("Submission cancelled");
                return Err(DeliveryError::RequestTimeout);
            }
            sent = tokio::time::timeout_at(deadline, self.send_with_retry(transport, body, log)) => match sent {
                Ok(response) => response?,
                Err(_) => {
                    tracing::warn!(deadline_secs = self.config.request_timeout_secs, "Submission deadline exceeded");
                    return Err(DeliveryError::RequestTimeout);
                }
            },
        };
        interpret(response)
    }

    /// Retries transient failures with exponential backoff, then makes one
    /// final attempt whose result is used whatever it is.
    async fn send_with_retry(
        &self,
        transport: &dyn Transport,
        body: &str,
        log: &mut AttemptLog,
    ) -> Result<TransportResponse, DeliveryError> {
        let retries = self.config.max_attempts.saturating_sub(1);
        let base_delay = self.config.base_delay();
        let max_delay = self.config.request_timeout().max(base_delay);
        let strategy = ExponentialBuilder::default()
            .with_min_delay(base_delay)
            .with_max_delay(max_delay)
            .with_factor(2.0)
            .with_max_times(retries as usize);
        let retry_synthetic = self.config.retry_synthetic_failures;
        let AttemptLog { attempts, backoff } = log;

        let result = (|| {
            *attempts += 1;
            attempt(transport, body)
        })
        .retry(strategy)
        .sleep(tokio::time::sleep)
        .when(|e: &DeliveryError| is_retryable(e, retry_synthetic))
        .notify(|e, delay| {
            tracing::warn!(error = %e, delay_ms = delay.as_millis(), "Transient delivery failure, retrying");
            backoff.push(delay);
        })
        .await;

        match result {
            Err(e) if is_retryable(&e, retry_synthetic) => {
                let delay = 2u32
                    .checked_pow(retries)
                    .and_then(|factor| base_delay.checked_mul(factor))
                    .map_or(max_delay, |delay| delay.min(max_delay));
                tracing::warn!(error = %e, delay_ms = delay.as_millis(), "Retries exhausted, making final attempt");
                tokio::time::sleep(delay).await;
                backoff.push(delay);
                *attempts += 1;
                attempt(transport, body).await
            }
            other => other,
        }
    }

    fn record(&self, result: &DeliveryResult) {
        let outcome = result.error.as_ref().map_or("success", DeliveryError::outcome_label);
        let local = result.error.as_ref().is_some_and(DeliveryError::is_local);
        self.metrics.submissions_total.add(1, &[KeyValue::new("outcome", outcome)]);
        if !local {
            self.metrics.attempts.record(u64::from(result.attempts), &[]);
        }

        if result.success {
            tracing::info!(submission_id = %result.submission_id, attempts = result.attempts, "Incident submitted");
        } else if local {
            tracing::info!(outcome, message = %result.message, "Incident rejected before sending");
        } else {
            tracing::warn!(
                outcome,
                attempts = result.attempts,
                message = %result.message,
                "Incident submission failed"
            );
        }
    }
}

fn is_retryable(error: &DeliveryError, retry_synthetic: bool) -> bool {
    match error {
        DeliveryError::ReceiverSynthesizedFailure(_) => retry_synthetic,
        other => other.is_transient(),
    }
}

/// One transport call, with transient statuses surfaced as errors so the
/// retry loop can see them.
async fn attempt(transport: &dyn Transport, body: &str) -> Result<TransportResponse, DeliveryError> {
    match transport.send(body).await {
        Ok(response) if is_transient_status(response.status) => {
            Err(DeliveryError::TransientServerError { status: response.status, body: response.body })
        }
        Ok(response) => Ok(response),
        Err(TransportError::Unreachable(reason)) => Err(DeliveryError::NetworkUnreachable(reason)),
        Err(TransportError::Timeout) => Err(DeliveryError::RequestTimeout),
        Err(TransportError::SyntheticOutage(reason)) => Err(DeliveryError::ReceiverSynthesizedFailure(reason)),
    }
}

fn interpret(response: TransportResponse) -> Result<Accepted, DeliveryError> {
    if !response.status.is_success() {
        return Err(DeliveryError::ServerRejected { status: response.status, body: response.body });
    }

    let ack: Acknowledgement =
        serde_json::from_str(&response.body).map_err(|e| DeliveryError::MalformedResponse(e.to_string()))?;
    let message = ack.message.filter(|m| !m.trim().is_empty());
    if ack.success {
        Ok(Accepted {
            message: message.unwrap_or_else(|| "Incident submitted successfully".to_string()),
            submission_id: ack.incident_id,
        })
    } else {
        Err(DeliveryError::Declined(message.unwrap_or_else(|| "Unknown error occurred".to_string())))
    }
}
