//! Integration tests for the SQS delivery queue
//!
//! Require an SQS queue (or ElasticMQ/LocalStack) whose URL is in
//! `QUEUE_URL`; set `QUEUE_ENDPOINT_URL` for an emulator.
//! Run with: cargo test -p mc_infra --test sqs_integration -- --ignored

#![cfg(feature = "aws-sqs")]

use std::time::Duration;

use mc_core::domain::entities::{DeliveryRequest, VerificationCode};
use mc_core::repositories::DeliveryQueue;
use mc_infra::queue::{QueueConfig, SqsDeliveryQueue};

fn queue_config(visibility_timeout: u64) -> QueueConfig {
    QueueConfig {
        queue_url: std::env::var("QUEUE_URL").ok(),
        endpoint_url: std::env::var("QUEUE_ENDPOINT_URL").ok(),
        visibility_timeout,
        wait_time: 1,
        ..QueueConfig::default()
    }
}

async fn drain(queue: &SqsDeliveryQueue) {
    loop {
        let messages = queue.receive(10).await.unwrap();
        if messages.is_empty() {
            break;
        }
        for message in messages {
            queue.acknowledge(&message.receipt_handle).await.unwrap();
        }
    }
}

#[tokio::test]
#[ignore] // Requires SQS or an SQS emulator
async fn test_enqueue_receive_acknowledge() {
    let queue = SqsDeliveryQueue::new(&queue_config(30)).await.unwrap();
    drain(&queue).await;

    let code = VerificationCode::new("sqs-it@example.com", "X7K2QP", 300);
    let message_id = queue.enqueue(&DeliveryRequest::for_code(&code)).await.unwrap();
    assert!(!message_id.is_empty());

    let received = queue.receive(10).await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].message_id, message_id);
    assert_eq!(received[0].receive_count, 1);

    let request = DeliveryRequest::decode(&received[0].body).unwrap();
    assert_eq!(request.identifier, "sqs-it@example.com");
    assert_eq!(request.code, "X7K2QP");

    queue.acknowledge(&received[0].receipt_handle).await.unwrap();
    assert!(queue.receive(10).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore] // Requires SQS or an SQS emulator
async fn test_unacknowledged_message_is_redelivered() {
    let queue = SqsDeliveryQueue::new(&queue_config(1)).await.unwrap();
    drain(&queue).await;

    let code = VerificationCode::new("redeliver@example.com", "AB12CD", 300);
    queue.enqueue(&DeliveryRequest::for_code(&code)).await.unwrap();

    let first = queue.receive(1).await.unwrap();
    assert_eq!(first.len(), 1);

    tokio::time::sleep(Duration::from_secs(2)).await;

    let second = queue.receive(1).await.unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].message_id, first[0].message_id);
    assert_eq!(second[0].receive_count, 2);

    queue.acknowledge(&second[0].receipt_handle).await.unwrap();
}
