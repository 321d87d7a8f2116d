//! Configuration for the email dispatcher and its worker pool

use std::time::Duration;

use mc_shared::config::{AppConfig, MAX_RECEIVE_BATCH};

/// Configuration for the email dispatcher
#[derive(Debug, Clone)]
pub struct EmailDispatcherConfig {
    /// Attempt at which a transiently failing message is acked and dropped
    pub max_attempts: u32,
    /// Upper bound on one provider call; must stay below the queue visibility timeout
    pub dispatch_timeout: Duration,
    /// Subject line of verification emails
    pub subject: String,
}

impl Default for EmailDispatcherConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            dispatch_timeout: Duration::from_secs(10),
            subject: "Your verification code".to_string(),
        }
    }
}

impl From<&AppConfig> for EmailDispatcherConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_attempts: config.dispatch.max_attempts,
            dispatch_timeout: config.dispatch.dispatch_timeout(),
            subject: config.email.subject.clone(),
        }
    }
}

/// Configuration for the dispatch worker pool
#[derive(Debug, Clone)]
pub struct WorkerPoolConfig {
    /// Number of messages dispatched concurrently
    pub workers: usize,
    /// Upper bound on messages requested per receive
    pub batch_size: usize,
    /// Base sleep when the queue is empty or unreachable
    pub poll_interval: Duration,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            batch_size: MAX_RECEIVE_BATCH,
            poll_interval: Duration::from_secs(1),
        }
    }
}

impl From<&AppConfig> for WorkerPoolConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            workers: config.dispatch.workers,
            batch_size: config.queue.batch_size,
            poll_interval: config.dispatch.poll_interval(),
        }
    }
}
