//! Tests for the in-memory delivery queue

use std::time::Duration;

use crate::domain::entities::{DeliveryRequest, VerificationCode};
use crate::repositories::delivery_queue::{DeliveryQueue, MemoryDeliveryQueue};

fn request(identifier: &str) -> DeliveryRequest {
    DeliveryRequest::for_code(&VerificationCode::new(identifier, "X7K2QP", 300))
}

#[tokio::test]
async fn test_enqueue_receive_acknowledge() {
    let queue = MemoryDeliveryQueue::new(Duration::from_secs(30));
    let id = queue.enqueue(&request("a@example.com")).await.unwrap();

    let received = queue.receive(10).await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].message_id, id);
    assert_eq!(received[0].receive_count, 1);

    let decoded = DeliveryRequest::decode(&received[0].body).unwrap();
    assert_eq!(decoded.identifier, "a@example.com");

    queue.acknowledge(&received[0].receipt_handle).await.unwrap();
    assert!(queue.is_empty().await);
}

#[tokio::test]
async fn test_receive_respects_max_messages() {
    let queue = MemoryDeliveryQueue::new(Duration::from_secs(30));
    for i in 0..5 {
        queue.enqueue(&request(&format!("user{}@example.com", i))).await.unwrap();
    }

    assert_eq!(queue.receive(3).await.unwrap().len(), 3);
    assert_eq!(queue.receive(3).await.unwrap().len(), 2);
    assert!(queue.receive(3).await.unwrap().is_empty());
    assert_eq!(queue.in_flight().await, 5);
}

#[tokio::test(start_paused = true)]
async fn test_unacknowledged_message_is_redelivered() {
    let queue = MemoryDeliveryQueue::new(Duration::from_secs(30));
    queue.enqueue(&request("a@example.com")).await.unwrap();

    let first = queue.receive(1).await.unwrap();
    assert_eq!(first.len(), 1);

    // Hidden during the visibility timeout
    tokio::time::advance(Duration::from_secs(29)).await;
    assert!(queue.receive(1).await.unwrap().is_empty());

    tokio::time::advance(Duration::from_secs(1)).await;
    let second = queue.receive(1).await.unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].message_id, first[0].message_id);
    assert_eq!(second[0].receive_count, 2);
    assert_ne!(second[0].receipt_handle, first[0].receipt_handle);
}

#[tokio::test(start_paused = true)]
async fn test_superseded_receipt_cannot_acknowledge() {
    let queue = MemoryDeliveryQueue::new(Duration::from_secs(30));
    queue.enqueue(&request("a@example.com")).await.unwrap();

    let first = queue.receive(1).await.unwrap();
    tokio::time::advance(Duration::from_secs(31)).await;
    let second = queue.receive(1).await.unwrap();

    assert!(queue.acknowledge(&first[0].receipt_handle).await.is_err());
    queue.acknowledge(&second[0].receipt_handle).await.unwrap();
    assert!(queue.is_empty().await);
}

#[tokio::test]
async fn test_push_raw_keeps_body_verbatim() {
    let queue = MemoryDeliveryQueue::default();
    queue.push_raw("{not json").await;

    let received = queue.receive(1).await.unwrap();
    assert_eq!(received[0].body, "{not json");
}
