use crate::services::receiver_service::{FaultInjector, MockReceiver};
use crate::services::transport::{Transport, TransportError, TransportResponse};
use async_trait::async_trait;
use std::sync::Arc;

/// In-process transport straight into a `MockReceiver`. Always reachable,
/// but subject to the injector's latency and synthetic outages.
#[derive(Debug, Clone)]
pub struct ReceiverTransport {
    receiver: Arc<MockReceiver>,
    faults: FaultInjector,
}

impl ReceiverTransport {
    #[must_use]
    pub const fn new(receiver: Arc<MockReceiver>, faults: FaultInjector) -> Self {
        Self { receiver, faults }
    }
}

#[async_trait]
impl Transport for ReceiverTransport {
    async fn send(&self, payload: &str) -> Result<TransportResponse, TransportError> {
        self.faults.delay().await;
        if self.faults.trips() {
            tracing::debug!("Injecting synthetic outage");
            return Err(TransportError::SyntheticOutage("Service temporarily unavailable".to_string()));
        }

        let reply = self.receiver.receive(payload).await;
        Ok(TransportResponse { status: reply.status(), body: reply.body })
    }
}
