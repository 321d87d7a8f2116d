//! Delivery queue configuration module

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Largest batch a single receive call may ask for (SQS hard limit)
pub const MAX_RECEIVE_BATCH: usize = 10;

/// Queue backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QueueBackend {
    /// Amazon SQS
    #[default]
    Sqs,
    /// In-process queue (development and tests only)
    Memory,
}

/// Delivery queue configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueueConfig {
    /// Which queue implementation to use
    #[serde(default)]
    pub backend: QueueBackend,

    /// Queue URL (SQS)
    #[serde(default)]
    pub queue_url: Option<String>,

    /// AWS region
    #[serde(default = "default_region")]
    pub region: String,

    /// Endpoint override for SQS-compatible emulators (ElasticMQ, LocalStack)
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Seconds a received message stays hidden from other consumers
    #[serde(default = "default_visibility_timeout")]
    pub visibility_timeout: u64,

    /// Long-poll wait per receive call in seconds (0 disables long polling)
    #[serde(default = "default_wait_time")]
    pub wait_time: u64,

    /// Upper bound on messages requested per receive call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            backend: QueueBackend::default(),
            queue_url: None,
            region: default_region(),
            endpoint_url: None,
            visibility_timeout: default_visibility_timeout(),
            wait_time: default_wait_time(),
            batch_size: default_batch_size(),
        }
    }
}

impl QueueConfig {
    pub fn visibility_timeout(&self) -> Duration {
        Duration::from_secs(self.visibility_timeout)
    }

    pub fn wait_time(&self) -> Duration {
        Duration::from_secs(self.wait_time)
    }
}

pub(crate) fn default_region() -> String {
    String::from("us-east-1")
}

fn default_visibility_timeout() -> u64 {
    60
}

fn default_wait_time() -> u64 {
    20
}

fn default_batch_size() -> usize {
    MAX_RECEIVE_BATCH
}
