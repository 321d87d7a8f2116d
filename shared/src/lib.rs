//! Shared configuration and utilities for the MailCode services
//!
//! This crate provides common functionality used across all workspace members:
//! - Layered application configuration
//! - Email address validation and masking
//! - Field-level validation helpers

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, CodeCharset, ConfigError, DispatchConfig, EmailConfig,
    EmailProviderKind, Environment, LogFormat, LoggingConfig, QueueBackend, QueueConfig,
    VerificationConfig,
};
pub use utils::{email, validation};
