//! Domain-specific error types and error handling.

mod provider;

// Re-export provider error types
pub use provider::{ProviderError, ProviderErrorCode};

use thiserror::Error;

#[cfg(test)]
mod tests;

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    /// The identifier is empty or not a syntactically valid email address
    #[error("Invalid identifier: {reason}")]
    InvalidIdentifier { reason: String },

    /// The code store could not be written or read
    #[error("Code store unavailable: {message}")]
    StoreUnavailable { message: String },

    /// The code was stored but the delivery request could not be enqueued
    #[error("Failed to enqueue delivery request: {message}")]
    DeliveryEnqueueFailed { message: String },

    /// The delivery queue could not be polled or acknowledged
    #[error("Delivery queue unavailable: {message}")]
    QueueUnavailable { message: String },

    /// A queue message body could not be decoded or failed validation
    #[error("Invalid delivery message: {message}")]
    InvalidMessage { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    /// Whether retrying the same call later may succeed
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            DomainError::StoreUnavailable { .. }
                | DomainError::DeliveryEnqueueFailed { .. }
                | DomainError::QueueUnavailable { .. }
        )
    }

    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::InvalidIdentifier { .. } => "INVALID_IDENTIFIER",
            DomainError::StoreUnavailable { .. } => "STORE_UNAVAILABLE",
            DomainError::DeliveryEnqueueFailed { .. } => "DELIVERY_ENQUEUE_FAILED",
            DomainError::QueueUnavailable { .. } => "QUEUE_UNAVAILABLE",
            DomainError::InvalidMessage { .. } => "INVALID_MESSAGE",
            DomainError::Configuration { .. } => "CONFIGURATION_ERROR",
            DomainError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::InvalidMessage {
            message: err.to_string(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
