//! Delivery queue implementations
//!
//! The in-memory queue lives in `mc_core`; this module provides the
//! production backend.

#[cfg(feature = "aws-sqs")]
pub mod sqs;

#[cfg(feature = "aws-sqs")]
pub use sqs::SqsDeliveryQueue;

pub use mc_shared::config::QueueConfig;
