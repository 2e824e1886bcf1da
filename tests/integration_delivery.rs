#![allow(clippy::unwrap_used, clippy::panic, clippy::missing_panics_doc, clippy::must_use_candidate, missing_debug_implementations, clippy::clone_on_ref_ptr, unreachable_pub)]
use incident_relay::adapters::mock::ReceiverTransport;
use incident_relay::config::DeliveryConfig;
use incident_relay::domain::email::EmailPolicy;
use incident_relay::domain::profile::MappingProfile;
use incident_relay::domain::submission::SubmissionId;
use incident_relay::error::DeliveryError;
use incident_relay::services::delivery_service::DeliveryClient;
use incident_relay::services::receiver_service::{FaultInjector, MockReceiver};
use incident_relay::services::transport::TransportError;
use incident_relay::services::validator::Validator;
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

mod common;
use common::ScriptedTransport;

fn in_process(profile: MappingProfile, faults: FaultInjector) -> (Arc<MockReceiver>, Arc<ReceiverTransport>) {
    let receiver = Arc::new(MockReceiver::new(Validator::new(profile, EmailPolicy::RoundTrip)));
    let transport = Arc::new(ReceiverTransport::new(Arc::clone(&receiver), faults));
    (receiver, transport)
}

#[tokio::test]
async fn test_invalid_form_never_reaches_transport() {
    common::setup_tracing();
    let transport = ScriptedTransport::accepting("INC-1");
    let client = DeliveryClient::new(MappingProfile::full(), transport.clone(), common::fast_delivery_config());

    let mut form = common::valid_form();
    form.title = "   ".to_string();
    form.reporter_email = "invalid-email".to_string();

    let result = client.submit(&form).await;
    assert!(!result.success);
    assert!(result.message.starts_with("Validation failed"), "{}", result.message);
    assert_eq!(result.validation_errors(), ["Title is required", "Please enter a valid email address"]);
    assert_eq!(result.attempts, 0);
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_submit_through_mock_receiver() {
    common::setup_tracing();
    let (receiver, transport) = in_process(MappingProfile::full(), FaultInjector::default());
    let client = DeliveryClient::new(MappingProfile::full(), transport, common::fast_delivery_config());

    let result = client.submit(&common::valid_form()).await;
    assert!(result.success, "{}", result.message);
    assert_eq!(result.message, "Incident submitted successfully");
    assert!(SubmissionId::is_well_formed(&result.submission_id), "{}", result.submission_id);
    assert_eq!(result.attempts, 1);
    assert!(result.backoff.is_empty());
    assert!(result.error.is_none());

    assert_eq!(receiver.count().await, 1);
    let stored = receiver.submissions().await;
    let payload = &stored[0].payload;
    assert_eq!(stored[0].id.as_str(), result.submission_id);
    assert_eq!(payload.priority_level.as_deref(), Some("P2"));
    assert_eq!(payload.incident_category.as_deref(), Some("technical"));
    assert_eq!(payload.contact_phone.as_deref(), Some("+15551234567"));
    assert_eq!(payload.is_urgent_flag, Some(true));
}

#[tokio::test]
async fn test_every_profile_round_trips() {
    for profile in [MappingProfile::full(), MappingProfile::contact(), MappingProfile::minimal()] {
        let (receiver, transport) = in_process(profile.clone(), FaultInjector::default());
        let client = DeliveryClient::new(profile.clone(), transport, common::fast_delivery_config());

        let result = client.submit(&common::valid_form()).await;
        assert!(result.success, "{:?}: {}", profile.kind, result.message);
        assert_eq!(receiver.count().await, 1);
    }
}

#[tokio::test]
async fn test_contact_profile_wire_names() {
    let (receiver, transport) = in_process(MappingProfile::contact(), FaultInjector::default());
    let client = DeliveryClient::new(MappingProfile::contact(), transport, common::fast_delivery_config());

    let mut form = common::valid_form();
    form.category = "Quantum".to_string();
    assert!(client.submit(&form).await.success);

    let stored = receiver.submissions().await;
    let payload = &stored[0].payload;
    assert_eq!(payload.contact_email.as_deref(), Some("jane.smith@company.com"));
    assert!(payload.reporter_email_address.is_none());
    assert_eq!(payload.priority_level.as_deref(), Some("priority_high"));
    assert_eq!(payload.incident_category.as_deref(), Some("general"));
    assert!(payload.device_information.is_none());
    assert!(payload.reported_date.as_deref().is_some_and(|stamp| stamp.ends_with('Z')));
    assert!(payload.report_timestamp.is_none());
}

#[tokio::test]
async fn test_preview_matches_wire_payload() {
    let transport = ScriptedTransport::always(Err(TransportError::Timeout));
    let client = DeliveryClient::new(MappingProfile::full(), transport.clone(), DeliveryConfig::default());

    let preview = client.preview(&common::valid_form());
    let value: serde_json::Value = serde_json::from_str(&preview).unwrap();
    assert_eq!(value["incident_title"], "Server Down");
    assert_eq!(value["report_timestamp"], "2024-03-01T14:30:00Z");
    assert_eq!(value["api_version"], "1.0");
    assert!(preview.contains('\n'));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_synthetic_outage_is_terminal_by_default() {
    common::setup_tracing();
    let (receiver, transport) = in_process(MappingProfile::full(), FaultInjector::new(Duration::ZERO, 1.0));
    let client = DeliveryClient::new(MappingProfile::full(), transport, common::fast_delivery_config());

    let result = client.submit(&common::valid_form()).await;
    assert!(!result.success);
    assert_eq!(result.message, "Mock API error: Service temporarily unavailable");
    assert!(matches!(result.error, Some(DeliveryError::ReceiverSynthesizedFailure(_))));
    assert_eq!(result.attempts, 1);
    assert_eq!(receiver.count().await, 0);
}

#[tokio::test]
async fn test_synthetic_outage_retried_when_enabled() {
    let (_receiver, transport) = in_process(MappingProfile::full(), FaultInjector::new(Duration::ZERO, 1.0));
    let config = DeliveryConfig { max_attempts: 2, retry_synthetic_failures: true, ..common::fast_delivery_config() };
    let client = DeliveryClient::new(MappingProfile::full(), transport, config);

    let result = client.submit(&common::valid_form()).await;
    assert!(!result.success);
    assert!(matches!(result.error, Some(DeliveryError::ReceiverSynthesizedFailure(_))));
    assert_eq!(result.attempts, 3);
    assert_eq!(result.backoff, [Duration::from_millis(5), Duration::from_millis(10)]);
}

#[tokio::test]
async fn test_unreachable_primary_falls_back_to_mock() {
    common::setup_tracing();
    let primary = ScriptedTransport::always(Err(TransportError::Unreachable("connection refused".into())));
    let (receiver, fallback) = in_process(MappingProfile::full(), FaultInjector::default());
    let config = DeliveryConfig { max_attempts: 1, fallback_to_mock: true, ..common::fast_delivery_config() };
    let client = DeliveryClient::new(MappingProfile::full(), primary.clone(), config).with_fallback(fallback);

    let result = client.submit(&common::valid_form()).await;
    assert!(result.success, "{}", result.message);
    assert_eq!(primary.calls(), 2);
    assert_eq!(result.attempts, 3);
    assert_eq!(receiver.count().await, 1);
}

#[tokio::test]
async fn test_fallback_ignored_when_disabled() {
    let primary = ScriptedTransport::always(Err(TransportError::Unreachable("connection refused".into())));
    let (receiver, fallback) = in_process(MappingProfile::full(), FaultInjector::default());
    let config = DeliveryConfig { max_attempts: 1, ..common::fast_delivery_config() };
    let client = DeliveryClient::new(MappingProfile::full(), primary, config).with_fallback(fallback);

    let result = client.submit(&common::valid_form()).await;
    assert!(!result.success);
    assert_eq!(result.message, "Network error: connection refused");
    assert_eq!(receiver.count().await, 0);
}

#[tokio::test]
async fn test_cancelled_submission_reports_timeout() {
    let transport = ScriptedTransport::accepting("INC-1");
    let client = DeliveryClient::new(MappingProfile::full(), transport.clone(), common::fast_delivery_config());

    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = client.submit_with_cancel(&common::valid_form(), cancel).await;

    assert!(!result.success);
    assert_eq!(result.error, Some(DeliveryError::RequestTimeout));
    assert_eq!(result.message, "Request timeout - please try again");
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_cancel_during_slow_delivery() {
    let transport = ScriptedTransport::slow(
        Duration::from_secs(30),
        ScriptedTransport::status(StatusCode::CREATED, &common::accepted_body("INC-1")),
    );
    let client = DeliveryClient::new(MappingProfile::full(), transport.clone(), common::fast_delivery_config());

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let result = client.submit_with_cancel(&common::valid_form(), cancel).await;
    assert_eq!(result.error, Some(DeliveryError::RequestTimeout));
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_deadline_exceeded_reports_timeout() {
    let transport = ScriptedTransport::slow(
        Duration::from_secs(30),
        ScriptedTransport::status(StatusCode::CREATED, &common::accepted_body("INC-1")),
    );
    let config = DeliveryConfig { request_timeout_secs: 1, ..common::fast_delivery_config() };
    let client = DeliveryClient::new(MappingProfile::full(), transport, config);

    let result = client.submit(&common::valid_form()).await;
    assert!(!result.success);
    assert_eq!(result.error, Some(DeliveryError::RequestTimeout));
}

#[tokio::test]
async fn test_deadline_spans_fallback_delivery() {
    let primary = ScriptedTransport::slow(
        Duration::from_millis(200),
        Err(TransportError::Unreachable("connection refused".into())),
    );
    let fallback = ScriptedTransport::slow(
        Duration::from_millis(900),
        ScriptedTransport::status(StatusCode::CREATED, &common::accepted_body("INC-1")),
    );
    let config = DeliveryConfig { request_timeout_secs: 1, fallback_to_mock: true, ..common::fast_delivery_config() };
    let client =
        DeliveryClient::new(MappingProfile::full(), primary.clone(), config).with_fallback(fallback.clone());

    let started = std::time::Instant::now();
    let result = client.submit(&common::valid_form()).await;
    let elapsed = started.elapsed();

    assert_eq!(result.error, Some(DeliveryError::RequestTimeout));
    assert_eq!(primary.calls(), 4);
    assert_eq!(fallback.calls(), 1);
    assert!(elapsed < Duration::from_millis(1300), "took {elapsed:?}");
}

#[tokio::test]
async fn test_malformed_response_body() {
    let transport = ScriptedTransport::always(ScriptedTransport::status(StatusCode::OK, "<html>maintenance</html>"));
    let client = DeliveryClient::new(MappingProfile::full(), transport.clone(), common::fast_delivery_config());

    let result = client.submit(&common::valid_form()).await;
    assert!(!result.success);
    assert!(result.message.starts_with("Data format error: "), "{}", result.message);
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_declined_acknowledgement() {
    let body = r#"{"success":false,"message":"Duplicate incident","incident_id":""}"#;
    let transport = ScriptedTransport::always(ScriptedTransport::status(StatusCode::OK, body));
    let client = DeliveryClient::new(MappingProfile::full(), transport, common::fast_delivery_config());

    let result = client.submit(&common::valid_form()).await;
    assert!(!result.success);
    assert_eq!(result.error, Some(DeliveryError::Declined("Duplicate incident".into())));
    assert_eq!(result.message, "Duplicate incident");
}

#[tokio::test]
async fn test_strict_email_policy_rejects_bare_domain() {
    let transport = ScriptedTransport::accepting("INC-1");
    let lenient = DeliveryClient::new(MappingProfile::full(), transport.clone(), common::fast_delivery_config());
    let strict = lenient.clone().with_email_policy(EmailPolicy::Strict);

    let mut form = common::valid_form();
    form.reporter_email = "ops@localhost".to_string();

    assert!(lenient.submit(&form).await.success);
    let result = strict.submit(&form).await;
    assert_eq!(result.validation_errors(), ["Please enter a valid email address"]);
}
