//! In-memory delivery queue for development and tests

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

use crate::domain::entities::DeliveryRequest;
use crate::errors::DomainError;

use super::trait_::{DeliveryQueue, ReceivedMessage};

#[derive(Debug, Clone)]
struct StoredMessage {
    id: String,
    body: String,
    receive_count: u32,
    visible_at: Instant,
    receipt_handle: Option<String>,
}

/// [`DeliveryQueue`] stored in a `Vec` behind a mutex
///
/// Implements visibility timeouts and receive counts against tokio's clock,
/// so redelivery can be exercised with a paused runtime. Not durable.
#[derive(Clone)]
pub struct MemoryDeliveryQueue {
    messages: Arc<Mutex<Vec<StoredMessage>>>,
    visibility_timeout: Duration,
}

impl MemoryDeliveryQueue {
    pub fn new(visibility_timeout: Duration) -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
            visibility_timeout,
        }
    }

    /// Enqueue a raw body, bypassing encoding
    pub async fn push_raw(&self, body: impl Into<String>) -> String {
        let id = Uuid::new_v4().to_string();
        self.messages.lock().await.push(StoredMessage {
            id: id.clone(),
            body: body.into(),
            receive_count: 0,
            visible_at: Instant::now(),
            receipt_handle: None,
        });
        id
    }

    /// Messages not yet acknowledged, in flight or not
    pub async fn len(&self) -> usize {
        self.messages.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.lock().await.is_empty()
    }

    /// Messages currently hidden by an unexpired receipt
    pub async fn in_flight(&self) -> usize {
        let now = Instant::now();
        self.messages
            .lock()
            .await
            .iter()
            .filter(|m| m.receipt_handle.is_some() && m.visible_at > now)
            .count()
    }

    /// Bodies of all unacknowledged messages
    pub async fn bodies(&self) -> Vec<String> {
        self.messages
            .lock()
            .await
            .iter()
            .map(|m| m.body.clone())
            .collect()
    }
}

impl Default for MemoryDeliveryQueue {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl DeliveryQueue for MemoryDeliveryQueue {
    async fn enqueue(&self, request: &DeliveryRequest) -> Result<String, DomainError> {
        let body = request.encode()?;
        Ok(self.push_raw(body).await)
    }

    async fn receive(&self, max_messages: usize) -> Result<Vec<ReceivedMessage>, DomainError> {
        let mut messages = self.messages.lock().await;
        let now = Instant::now();

        let received = messages
            .iter_mut()
            .filter(|m| m.visible_at <= now)
            .take(max_messages)
            .map(|m| {
                let receipt_handle = Uuid::new_v4().to_string();
                m.receive_count += 1;
                m.visible_at = now + self.visibility_timeout;
                m.receipt_handle = Some(receipt_handle.clone());
                ReceivedMessage {
                    message_id: m.id.clone(),
                    receipt_handle,
                    body: m.body.clone(),
                    receive_count: m.receive_count,
                }
            })
            .collect();

        Ok(received)
    }

    async fn acknowledge(&self, receipt_handle: &str) -> Result<(), DomainError> {
        let mut messages = self.messages.lock().await;
        let pos = messages
            .iter()
            .position(|m| m.receipt_handle.as_deref() == Some(receipt_handle));

        match pos {
            Some(idx) => {
                messages.remove(idx);
                Ok(())
            }
            None => Err(DomainError::QueueUnavailable {
                message: "receipt handle is unknown or superseded".to_string(),
            }),
        }
    }
}
