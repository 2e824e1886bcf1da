use crate::error::DeliveryError;
use std::time::Duration;

/// What the caller gets back from one submission, whatever happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryResult {
    pub success: bool,
    pub message: String,
    /// Empty unless the accepting side assigned one.
    pub submission_id: String,
    pub error: Option<DeliveryError>,
    /// Transport calls made, including the final unconditional one.
    pub attempts: u32,
    /// Backoff delays slept between attempts, in order.
    pub backoff: Vec<Duration>,
}

impl DeliveryResult {
    pub(crate) fn succeeded(message: String, submission_id: String, attempts: u32, backoff: Vec<Duration>) -> Self {
        Self { success: true, message, submission_id, error: None, attempts, backoff }
    }

    pub(crate) fn failed(error: DeliveryError, attempts: u32, backoff: Vec<Duration>) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            submission_id: String::new(),
            error: Some(error),
            attempts,
            backoff,
        }
    }

    /// The underlying validation errors when the submission was rejected locally.
    #[must_use]
    pub fn validation_errors(&self) -> &[String] {
        match &self.error {
            Some(DeliveryError::FormInvalid(errors) | DeliveryError::PayloadInvalid(errors)) => errors,
            _ => &[],
        }
    }
}
