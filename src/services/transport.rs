use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

/// Status and raw body returned by one transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TransportResponse {
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("{0}")]
    Unreachable(String),
    #[error("Request timed out")]
    Timeout,
    #[error("{0}")]
    SyntheticOutage(String),
}

#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Sends one serialized payload to the submission endpoint.
    ///
    /// # Errors
    /// Returns `TransportError` when no response was obtained at all.
    async fn send(&self, payload: &str) -> Result<TransportResponse, TransportError>;
}

/// Statuses worth retrying: request-timeout, service-unavailable, any 5xx.
#[must_use]
pub fn is_transient_status(status: StatusCode) -> bool {
    status == StatusCode::REQUEST_TIMEOUT || status == StatusCode::SERVICE_UNAVAILABLE || status.is_server_error()
}
