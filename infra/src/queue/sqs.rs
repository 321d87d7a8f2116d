//! Amazon SQS delivery queue
//!
//! Delivery requests are JSON message bodies. Receives use long polling and
//! request `ApproximateReceiveCount` so the dispatcher can bound attempts;
//! acknowledging deletes the message by receipt handle.

use async_trait::async_trait;
use aws_sdk_sqs::{
    error::DisplayErrorContext,
    types::{Message, MessageSystemAttributeName},
    Client as SqsClient,
};
use tracing::{debug, error, info, warn};

use mc_core::domain::entities::DeliveryRequest;
use mc_core::errors::{DomainError, DomainResult};
use mc_core::repositories::{DeliveryQueue, ReceivedMessage};
use mc_shared::config::{QueueConfig, MAX_RECEIVE_BATCH};

use crate::InfrastructureError;

/// [`DeliveryQueue`] backed by an SQS standard queue
#[derive(Clone)]
pub struct SqsDeliveryQueue {
    client: SqsClient,
    queue_url: String,
    visibility_timeout: i32,
    wait_time: i32,
}

impl SqsDeliveryQueue {
    /// Create a queue client from configuration
    ///
    /// Credentials come from the default AWS provider chain.
    pub async fn new(config: &QueueConfig) -> Result<Self, InfrastructureError> {
        let queue_url = config
            .queue_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| InfrastructureError::Config("queue.queue_url is required for SQS".to_string()))?;

        let sdk_config =
            crate::aws::load_sdk_config(&config.region, config.endpoint_url.as_deref()).await;

        info!(
            region = %config.region,
            visibility_timeout = config.visibility_timeout,
            wait_time = config.wait_time,
            event = "sqs_queue_initialized",
            "SQS delivery queue initialized"
        );

        Ok(Self::from_client(SqsClient::new(&sdk_config), queue_url, config))
    }

    /// Wrap an existing SDK client
    pub fn from_client(client: SqsClient, queue_url: impl Into<String>, config: &QueueConfig) -> Self {
        Self {
            client,
            queue_url: queue_url.into(),
            visibility_timeout: clamp_seconds(config.visibility_timeout),
            wait_time: clamp_seconds(config.wait_time),
        }
    }

    pub fn queue_url(&self) -> &str {
        &self.queue_url
    }
}

#[async_trait]
impl DeliveryQueue for SqsDeliveryQueue {
    async fn enqueue(&self, request: &DeliveryRequest) -> DomainResult<String> {
        let body = request.encode()?;

        let output = self
            .client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| DomainError::DeliveryEnqueueFailed {
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let message_id = output.message_id().unwrap_or_default().to_string();
        debug!(message_id = %message_id, "Delivery request sent to SQS");
        Ok(message_id)
    }

    async fn receive(&self, max_messages: usize) -> DomainResult<Vec<ReceivedMessage>> {
        let max_messages = max_messages.clamp(1, MAX_RECEIVE_BATCH) as i32;

        let output = self
            .client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(max_messages)
            .wait_time_seconds(self.wait_time)
            .visibility_timeout(self.visibility_timeout)
            .message_system_attribute_names(MessageSystemAttributeName::ApproximateReceiveCount)
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(&e).to_string();
                error!(error = %message, event = "sqs_receive_failed", "SQS receive failed");
                DomainError::QueueUnavailable { message }
            })?;

        Ok(output.messages().iter().filter_map(to_received_message).collect())
    }

    async fn acknowledge(&self, receipt_handle: &str) -> DomainResult<()> {
        self.client
            .delete_message()
            .queue_url(&self.queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|e| DomainError::QueueUnavailable {
                message: DisplayErrorContext(&e).to_string(),
            })?;
        Ok(())
    }
}

/// Convert an SQS message, skipping messages that cannot be acknowledged
pub(crate) fn to_received_message(message: &Message) -> Option<ReceivedMessage> {
    let message_id = message.message_id().unwrap_or_default().to_string();

    let Some(receipt_handle) = message.receipt_handle() else {
        warn!(
            message_id = %message_id,
            event = "sqs_message_without_receipt",
            "Skipping SQS message without receipt handle"
        );
        return None;
    };

    let receive_count = message
        .attributes()
        .and_then(|attributes| attributes.get(&MessageSystemAttributeName::ApproximateReceiveCount))
        .and_then(|count| count.parse::<u32>().ok())
        .unwrap_or(1);

    Some(ReceivedMessage {
        message_id,
        receipt_handle: receipt_handle.to_string(),
        body: message.body().unwrap_or_default().to_string(),
        receive_count,
    })
}

fn clamp_seconds(seconds: u64) -> i32 {
    seconds.min(i32::MAX as u64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(receipt: Option<&str>, count: Option<&str>) -> Message {
        let mut builder = Message::builder().message_id("m-1").body("{\"identifier\":\"a@example.com\"}");
        if let Some(receipt) = receipt {
            builder = builder.receipt_handle(receipt);
        }
        if let Some(count) = count {
            builder = builder.attributes(MessageSystemAttributeName::ApproximateReceiveCount, count);
        }
        builder.build()
    }

    #[test]
    fn test_to_received_message() {
        let received = to_received_message(&message(Some("r-1"), Some("3"))).unwrap();

        assert_eq!(received.message_id, "m-1");
        assert_eq!(received.receipt_handle, "r-1");
        assert_eq!(received.receive_count, 3);
        assert!(received.body.contains("a@example.com"));
    }

    #[test]
    fn test_missing_receive_count_counts_as_first_receipt() {
        let received = to_received_message(&message(Some("r-1"), None)).unwrap();
        assert_eq!(received.receive_count, 1);

        let garbled = to_received_message(&message(Some("r-1"), Some("many"))).unwrap();
        assert_eq!(garbled.receive_count, 1);
    }

    #[test]
    fn test_message_without_receipt_is_skipped() {
        assert!(to_received_message(&message(None, Some("1"))).is_none());
    }

    #[test]
    fn test_clamp_seconds() {
        assert_eq!(clamp_seconds(60), 60);
        assert_eq!(clamp_seconds(u64::MAX), i32::MAX);
    }

    #[tokio::test]
    async fn test_new_requires_queue_url() {
        let config = QueueConfig::default();
        let result = SqsDeliveryQueue::new(&config).await;
        assert!(matches!(result, Err(InfrastructureError::Config(_))));
    }
}
