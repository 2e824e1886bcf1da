use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the receiver's HTTP surface.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unavailable(msg) => {
                tracing::warn!(message = %msg, "Service unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, msg)
            }
        };

        let body = Json(json!({
            "success": false,
            "error": message
        }));

        (status, body).into_response()
    }
}

/// Why a submission did not end in an accepted acknowledgement.
///
/// The `Display` text is the message handed back to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("Validation failed: {}", .0.join(", "))]
    FormInvalid(Vec<String>),
    #[error("Validation failed: {}", .0.join(", "))]
    PayloadInvalid(Vec<String>),
    #[error("Network error: {0}")]
    NetworkUnreachable(String),
    #[error("Request timeout - please try again")]
    RequestTimeout,
    #[error("API call failed: {status} - {body}")]
    ServerRejected { status: StatusCode, body: String },
    #[error("API call failed: {status} - {body}")]
    TransientServerError { status: StatusCode, body: String },
    #[error("Data format error: {0}")]
    MalformedResponse(String),
    #[error("Mock API error: {0}")]
    ReceiverSynthesizedFailure(String),
    #[error("{0}")]
    Declined(String),
}

impl DeliveryError {
    /// Whether the failure is likely to clear on an immediate retry.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::NetworkUnreachable(_) | Self::RequestTimeout | Self::TransientServerError { .. })
    }

    /// Whether the failure happened before any network attempt.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::FormInvalid(_) | Self::PayloadInvalid(_))
    }

    pub(crate) const fn outcome_label(&self) -> &'static str {
        match self {
            Self::FormInvalid(_) => "form_invalid",
            Self::PayloadInvalid(_) => "payload_invalid",
            Self::NetworkUnreachable(_) => "network_unreachable",
            Self::RequestTimeout => "request_timeout",
            Self::ServerRejected { .. } => "server_rejected",
            Self::TransientServerError { .. } => "transient_server_error",
            Self::MalformedResponse(_) => "malformed_response",
            Self::ReceiverSynthesizedFailure(_) => "receiver_synthesized_failure",
            Self::Declined(_) => "declined",
        }
    }
}
