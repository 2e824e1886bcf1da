use crate::config::DeliveryConfig;
use crate::services::transport::{Transport, TransportError, TransportResponse};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};

/// Delivers payloads to `POST {base}/api/incidents` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Builds a client with the configured per-request timeout and user agent.
    ///
    /// # Errors
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(config: &DeliveryConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, endpoint: config.endpoint() })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(skip(self, payload), fields(endpoint = %self.endpoint))]
    async fn send(&self, payload: &str) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(payload.to_owned())
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let body = response.text().await.map_err(classify)?;
        tracing::debug!(status = %status, "Response received");
        Ok(TransportResponse { status, body })
    }
}

fn classify(error: reqwest::Error) -> TransportError {
    if error.is_timeout() { TransportError::Timeout } else { TransportError::Unreachable(error.to_string()) }
}
