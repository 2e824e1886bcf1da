#![allow(dead_code)]
use async_trait::async_trait;
use incident_relay::config::{DeliveryConfig, ReceiverConfig, ServerConfig};
use incident_relay::domain::form::FormRecord;
use incident_relay::services::receiver_service::MockReceiver;
use incident_relay::services::transport::{Transport, TransportError, TransportResponse};
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use time::macros::datetime;

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("incident_relay=debug".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}

/// A form every profile accepts.
pub fn valid_form() -> FormRecord {
    let mut form = FormRecord::new(
        "Server Down",
        "Main server is not responding to requests.",
        "Jane Smith",
        "jane.smith@company.com",
        datetime!(2024-03-01 14:30:00 UTC),
    );
    form.priority = "High".to_string();
    form.category = "Technical".to_string();
    form.phone = Some("5551234567".to_string());
    form.location = Some("Data Center A".to_string());
    form.is_urgent = true;
    form
}

/// Delivery settings with millisecond backoff so retry tests finish quickly.
pub fn fast_delivery_config() -> DeliveryConfig {
    DeliveryConfig { base_delay_ms: 5, request_timeout_secs: 10, ..DeliveryConfig::default() }
}

pub fn accepted_body(incident_id: &str) -> String {
    serde_json::json!({
        "success": true,
        "message": "Incident submitted successfully",
        "incident_id": incident_id,
    })
    .to_string()
}

/// Replays a fixed script of outcomes, then repeats `exhausted` forever.
#[derive(Debug)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    exhausted: Result<TransportResponse, TransportError>,
    calls: AtomicUsize,
    delay: Duration,
}

impl ScriptedTransport {
    pub fn new(
        script: Vec<Result<TransportResponse, TransportError>>,
        exhausted: Result<TransportResponse, TransportError>,
    ) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            exhausted,
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
        })
    }

    /// Always answers 201 with an accepting acknowledgement.
    pub fn accepting(incident_id: &str) -> Arc<Self> {
        Self::always(Self::status(StatusCode::CREATED, &accepted_body(incident_id)))
    }

    /// Always answers with `outcome`.
    pub fn always(outcome: Result<TransportResponse, TransportError>) -> Arc<Self> {
        Self::new(Vec::new(), outcome)
    }

    /// Answers with `outcome` after sleeping for `delay` on every call.
    pub fn slow(delay: Duration, outcome: Result<TransportResponse, TransportError>) -> Arc<Self> {
        Arc::new(Self { script: Mutex::new(VecDeque::new()), exhausted: outcome, calls: AtomicUsize::new(0), delay })
    }

    pub fn status(status: StatusCode, body: &str) -> Result<TransportResponse, TransportError> {
        Ok(TransportResponse::new(status, body))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, _payload: &str) -> Result<TransportResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.exhausted.clone())
    }
}

/// The receiver served over HTTP on an ephemeral local port.
pub struct TestServer {
    pub base_url: String,
    pub receiver: Arc<MockReceiver>,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn() -> Self {
        Self::spawn_with_config(ReceiverConfig::default()).await
    }

    pub async fn spawn_with_config(receiver_config: ReceiverConfig) -> Self {
        setup_tracing();
        let server_config = ServerConfig { host: "127.0.0.1".to_string(), port: 0, ..ServerConfig::default() };
        let (router, receiver) = incident_relay::receiver_app(&server_config, &receiver_config);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router.into_make_service_with_connect_info::<std::net::SocketAddr>())
                .await
                .unwrap();
        });

        Self { base_url: format!("http://{addr}"), receiver, client: reqwest::Client::new() }
    }
}

/// A local address nothing is listening on.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
