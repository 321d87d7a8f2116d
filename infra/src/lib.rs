//! # Infrastructure Layer
//!
//! Concrete implementations of the ports defined in `mc_core`:
//!
//! - **Cache**: Redis client with retry and the Redis-backed code store
//! - **Queue**: Amazon SQS delivery queue
//! - **Email**: Amazon SES, HTTP (Brevo-style) and log-only email providers
//!
//! ## Features
//!
//! - `aws-sqs`: Enable the SQS delivery queue (default)
//! - `aws-ses`: Enable the SES email provider (default)

// Re-export core types for convenience
pub use mc_core::errors::*;

/// Cache module - Redis client and code store
pub mod cache;

/// Email module - email provider implementations
pub mod email;

/// Queue module - delivery queue implementations
pub mod queue;

#[cfg(any(feature = "aws-sqs", feature = "aws-ses"))]
mod aws;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Delivery queue error
    #[error("Queue error: {0}")]
    Queue(String),

    /// Email provider error
    #[error("Email service error: {0}")]
    Email(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Config(message) => DomainError::Configuration { message },
            InfrastructureError::Cache(e) => DomainError::StoreUnavailable {
                message: e.to_string(),
            },
            InfrastructureError::Queue(message) => DomainError::QueueUnavailable { message },
            other => DomainError::Internal {
                message: other.to_string(),
            },
        }
    }
}
