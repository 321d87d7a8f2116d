//! Delivery queue trait decoupling code generation from email dispatch.
//!
//! The contract is at-least-once with a visibility timeout: a received
//! message stays hidden from other consumers for the timeout and is
//! redelivered unless acknowledged. There is no ordering guarantee and a
//! message may be delivered more than once, including to racing consumers.

use async_trait::async_trait;

use crate::domain::entities::DeliveryRequest;
use crate::errors::DomainError;

/// One receipt of a queue message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    /// Queue-assigned message id, stable across redeliveries
    pub message_id: String,
    /// Token for this receipt, used to acknowledge it
    pub receipt_handle: String,
    /// Raw message body
    pub body: String,
    /// How many times the queue has handed this message out, this receipt included
    pub receive_count: u32,
}

/// At-least-once queue of delivery requests
#[async_trait]
pub trait DeliveryQueue: Send + Sync {
    /// Enqueue a delivery request
    ///
    /// # Returns
    /// * `Ok(String)` - Queue-assigned message id
    /// * `Err(DomainError::DeliveryEnqueueFailed)` - Queue rejected or could not be reached
    async fn enqueue(&self, request: &DeliveryRequest) -> Result<String, DomainError>;

    /// Receive up to `max_messages` visible messages
    ///
    /// Returns an empty vector when nothing is visible. Received messages
    /// become invisible for the visibility timeout.
    async fn receive(&self, max_messages: usize) -> Result<Vec<ReceivedMessage>, DomainError>;

    /// Delete a received message so it is not redelivered
    async fn acknowledge(&self, receipt_handle: &str) -> Result<(), DomainError>;
}
