//! Email dispatch service module
//!
//! This module consumes delivery requests from the delivery queue:
//! - Sends each code through an email provider with a bounded timeout
//! - Classifies provider failures as transient or permanent
//! - Acknowledges deterministic outcomes, leaves transient ones for redelivery
//! - Abandons poison messages after a bounded number of attempts
//! - Runs a fixed-size worker pool with backpressure and graceful drain

mod classifier;
mod config;
mod pool;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use classifier::{DefaultErrorClassifier, ErrorClassifier, FailureKind};
pub use config::{EmailDispatcherConfig, WorkerPoolConfig};
pub use pool::WorkerPool;
pub use service::EmailDispatcher;
pub use traits::EmailServiceTrait;
pub use types::{BatchReport, Disposition, DispositionCounts};
