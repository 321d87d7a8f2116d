//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `cache` - Redis code store connection
//! - `dispatch` - Email dispatcher worker pool
//! - `email` - Email provider selection and sender identity
//! - `environment` - Environment detection and logging configuration
//! - `queue` - Delivery queue backend and visibility settings
//! - `verification` - Code length, charset and lifetime
//!
//! Values are layered: built-in defaults for the detected environment, then an
//! optional `config.<environment>.toml`, then `MAILCODE__SECTION__KEY`
//! environment variables, then the legacy `REDIS_CACHE` / `REDIS_URL` and
//! `QUEUE_URL` variables.

pub mod cache;
pub mod dispatch;
pub mod email;
pub mod environment;
pub mod queue;
pub mod verification;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::email::is_valid_email;
use crate::utils::validation::{validators, Validate, ValidationErrors};

// Re-export commonly used types
pub use cache::CacheConfig;
pub use dispatch::DispatchConfig;
pub use email::{EmailConfig, EmailProviderKind};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use queue::{QueueBackend, QueueConfig, MAX_RECEIVE_BATCH};
pub use verification::{CodeCharset, VerificationConfig, MIN_CODE_LENGTH};

/// Prefix of environment variables read by [`AppConfig::load`]
pub const ENV_PREFIX: &str = "MAILCODE";

/// Longest code accepted by configuration validation
const MAX_CODE_LENGTH: usize = 64;

/// Longest SQS long-poll wait in seconds
const MAX_WAIT_TIME: u64 = 20;

/// Largest dispatch worker pool
const MAX_WORKERS: usize = 1024;

/// Longest idle poll interval in milliseconds
const MAX_POLL_INTERVAL_MS: u64 = 60_000;

/// Longest initial Redis retry delay in milliseconds
const MAX_RETRY_DELAY_MS: u64 = 60_000;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationErrors),
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Code store configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Code generation configuration
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Delivery queue configuration
    #[serde(default)]
    pub queue: QueueConfig,

    /// Dispatcher configuration
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Email provider configuration
    #[serde(default)]
    pub email: EmailConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Built-in defaults for an environment
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            email: EmailConfig::for_environment(environment),
            logging: LoggingConfig::for_environment(environment),
            ..Default::default()
        }
    }

    /// Load configuration from files and environment, then validate it
    pub fn load() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        dotenvy::from_filename(environment.env_file()).ok();
        dotenvy::dotenv().ok();

        let defaults = Self::for_environment(environment);
        let settings = ::config::Config::builder()
            .add_source(::config::Config::try_from(&defaults)?)
            .add_source(::config::File::with_name(&environment.config_file()).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("cache.url", legacy_redis_url())?
            .set_override_option("queue.queue_url", std::env::var("QUEUE_URL").ok())?
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let code_length = self.verification.code_length;
        errors.check(
            (MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&code_length),
            "verification.code_length",
            format!("must be between {} and {}", MIN_CODE_LENGTH, MAX_CODE_LENGTH),
        );
        errors.check(
            self.verification.ttl_seconds > 0,
            "verification.ttl_seconds",
            "must be positive",
        );

        errors.check(
            (1..=MAX_WORKERS).contains(&self.dispatch.workers),
            "dispatch.workers",
            format!("must be between 1 and {}", MAX_WORKERS),
        );
        errors.check(
            (1..=MAX_POLL_INTERVAL_MS).contains(&self.dispatch.poll_interval_ms),
            "dispatch.poll_interval_ms",
            format!("must be between 1 and {}", MAX_POLL_INTERVAL_MS),
        );
        errors.check(
            self.cache.retry_delay_ms <= MAX_RETRY_DELAY_MS,
            "cache.retry_delay_ms",
            format!("must not exceed {}", MAX_RETRY_DELAY_MS),
        );
        errors.check(
            self.dispatch.max_attempts > 0,
            "dispatch.max_attempts",
            "must be at least 1",
        );
        errors.check(
            self.dispatch.dispatch_timeout_ms > 0,
            "dispatch.dispatch_timeout_ms",
            "must be positive",
        );
        errors.check(
            self.dispatch.dispatch_timeout() < self.queue.visibility_timeout(),
            "dispatch.dispatch_timeout_ms",
            "must be shorter than queue.visibility_timeout",
        );

        errors.check(
            (1..=MAX_RECEIVE_BATCH).contains(&self.queue.batch_size),
            "queue.batch_size",
            format!("must be between 1 and {}", MAX_RECEIVE_BATCH),
        );
        errors.check(
            self.queue.wait_time <= MAX_WAIT_TIME,
            "queue.wait_time",
            format!("must not exceed {} seconds", MAX_WAIT_TIME),
        );
        if self.queue.backend == QueueBackend::Sqs {
            let url_ok = self
                .queue
                .queue_url
                .as_deref()
                .is_some_and(validators::is_valid_url);
            errors.check(url_ok, "queue.queue_url", "an http(s) URL is required for sqs");
        }

        errors.check(
            is_valid_email(&self.email.sender),
            "email.sender",
            "must be a valid email address",
        );
        errors.check(
            validators::not_empty(&self.email.subject),
            "email.subject",
            "must not be empty",
        );
        errors.check(
            self.email.provider != EmailProviderKind::Mock || self.environment.is_development(),
            "email.provider",
            format!("mock provider sends nothing and is not allowed in {}", self.environment),
        );
        if self.email.provider == EmailProviderKind::Http {
            errors.check(
                validators::is_valid_url(&self.email.http_endpoint),
                "email.http_endpoint",
                "must be an http(s) URL",
            );
            errors.check(
                self.email
                    .http_api_key
                    .as_deref()
                    .is_some_and(validators::not_empty),
                "email.http_api_key",
                "is required for the http provider",
            );
        }

        errors.check(
            validators::not_empty(&self.logging.level),
            "logging.level",
            "must not be empty",
        );

        errors.into_result()
    }
}

/// Redis location from the legacy variables, normalized to a URL
///
/// `REDIS_CACHE` historically held a bare `host:port` address.
fn legacy_redis_url() -> Option<String> {
    std::env::var("REDIS_URL")
        .ok()
        .or_else(|| std::env::var("REDIS_CACHE").ok())
        .map(|addr| normalize_redis_url(&addr))
}

fn normalize_redis_url(addr: &str) -> String {
    let addr = addr.trim();
    if addr.contains("://") {
        addr.to_string()
    } else {
        format!("redis://{}", addr)
    }
}
