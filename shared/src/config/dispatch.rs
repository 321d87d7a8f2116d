//! Email dispatcher configuration module

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Dispatcher worker pool settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DispatchConfig {
    /// Number of concurrent dispatch workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Attempts after which a transiently failing message is dropped
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Upper bound on a single provider call in milliseconds
    #[serde(default = "default_dispatch_timeout_ms")]
    pub dispatch_timeout_ms: u64,

    /// Sleep between polls when the queue is empty or unreachable, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            max_attempts: default_max_attempts(),
            dispatch_timeout_ms: default_dispatch_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl DispatchConfig {
    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_millis(self.dispatch_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn default_workers() -> usize {
    4
}

fn default_max_attempts() -> u32 {
    5
}

fn default_dispatch_timeout_ms() -> u64 {
    10_000
}

fn default_poll_interval_ms() -> u64 {
    1_000
}
