//! Unit tests for the email dispatcher

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::value_objects::DeliveryOutcome;
use crate::errors::ProviderErrorCode;
use crate::repositories::{DeliveryQueue, MemoryDeliveryQueue};
use crate::services::dispatch::{
    DefaultErrorClassifier, Disposition, EmailDispatcher, EmailDispatcherConfig,
};

use super::mocks::{request, AckFailingQueue, MockEmailService};

const VISIBILITY: Duration = Duration::from_secs(30);

fn dispatcher(
    email: MockEmailService,
) -> (
    EmailDispatcher<MemoryDeliveryQueue, MockEmailService>,
    Arc<MemoryDeliveryQueue>,
    Arc<MockEmailService>,
) {
    let queue = Arc::new(MemoryDeliveryQueue::new(VISIBILITY));
    let email = Arc::new(email);
    let dispatcher = EmailDispatcher::new(queue.clone(), email.clone(), EmailDispatcherConfig::default());
    (dispatcher, queue, email)
}

#[tokio::test]
async fn test_dispatch_sends_code_to_identifier() {
    let (dispatcher, _queue, email) = dispatcher(MockEmailService::accepting());

    let outcome = dispatcher.dispatch(&request("a@example.com", "X7K2QP")).await;

    assert!(outcome.is_sent());
    let sent = email.sent_to("a@example.com");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Your verification code");
    assert!(sent[0].html_body.contains("X7K2QP"));
}

#[tokio::test]
async fn test_dispatch_classifies_failures() {
    let email = MockEmailService::accepting()
        .then_fail(ProviderErrorCode::InvalidAddress)
        .then_fail(ProviderErrorCode::Throttled);
    let (dispatcher, _queue, _email) = dispatcher(email);
    let req = request("a@example.com", "X7K2QP");

    assert!(dispatcher.dispatch(&req).await.is_permanent());
    assert!(dispatcher.dispatch(&req).await.is_transient());
    assert!(dispatcher.dispatch(&req).await.is_sent());
}

#[tokio::test(start_paused = true)]
async fn test_dispatch_timeout_is_transient() {
    let email = MockEmailService::accepting().with_delay(Duration::from_secs(60));
    let (dispatcher, _queue, email) = dispatcher(email);

    let outcome = dispatcher.dispatch(&request("a@example.com", "X7K2QP")).await;

    match outcome {
        DeliveryOutcome::TransientFailure { reason } => assert!(reason.contains("10000ms")),
        other => panic!("expected transient failure, got {:?}", other),
    }
    assert!(email.sent_to("a@example.com").is_empty());
}

#[tokio::test]
async fn test_success_acknowledges_message() {
    let (dispatcher, queue, _email) = dispatcher(MockEmailService::accepting());
    queue.enqueue(&request("a@example.com", "X7K2QP")).await.unwrap();

    let messages = queue.receive(1).await.unwrap();
    let disposition = dispatcher.handle_message(&messages[0]).await;

    assert_eq!(disposition, Disposition::Delivered);
    assert!(queue.is_empty().await);
}

#[tokio::test]
async fn test_permanent_failure_acknowledges_message() {
    let (dispatcher, queue, _email) =
        dispatcher(MockEmailService::failing(ProviderErrorCode::AccountSuspended));
    queue.enqueue(&request("a@example.com", "X7K2QP")).await.unwrap();

    let messages = queue.receive(1).await.unwrap();
    let disposition = dispatcher.handle_message(&messages[0]).await;

    assert_eq!(disposition, Disposition::Rejected);
    assert!(queue.is_empty().await);
}

#[tokio::test]
async fn test_transient_failure_never_acknowledges() {
    let (dispatcher, queue, _email) = dispatcher(MockEmailService::failing(ProviderErrorCode::Network));
    queue.enqueue(&request("a@example.com", "X7K2QP")).await.unwrap();

    let messages = queue.receive(1).await.unwrap();
    let disposition = dispatcher.handle_message(&messages[0]).await;

    assert_eq!(disposition, Disposition::Retry);
    assert_eq!(queue.len().await, 1);
    assert_eq!(queue.in_flight().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_poison_message_abandoned_on_fifth_attempt() {
    let (dispatcher, queue, email) = dispatcher(MockEmailService::failing(ProviderErrorCode::Throttled));
    queue.enqueue(&request("a@example.com", "X7K2QP")).await.unwrap();

    for attempt in 1..=4 {
        let messages = queue.receive(1).await.unwrap();
        assert_eq!(messages[0].receive_count, attempt);
        assert_eq!(dispatcher.handle_message(&messages[0]).await, Disposition::Retry);
        tokio::time::advance(VISIBILITY).await;
    }

    let messages = queue.receive(1).await.unwrap();
    assert_eq!(dispatcher.handle_message(&messages[0]).await, Disposition::Abandoned);
    assert!(queue.is_empty().await);
    assert_eq!(email.calls(), 5);
}

#[tokio::test]
async fn test_prior_delivery_attempts_count_toward_limit() {
    let (dispatcher, queue, _email) = dispatcher(MockEmailService::failing(ProviderErrorCode::Timeout));
    let mut req = request("a@example.com", "X7K2QP");
    req.delivery_attempt = 4;
    queue.enqueue(&req).await.unwrap();

    let messages = queue.receive(1).await.unwrap();
    assert_eq!(dispatcher.handle_message(&messages[0]).await, Disposition::Abandoned);
    assert!(queue.is_empty().await);
}

#[tokio::test]
async fn test_malformed_body_is_dropped() {
    let (dispatcher, queue, email) = dispatcher(MockEmailService::accepting());
    queue.push_raw(r#"{"identifier":"not-an-address","code":"X7K2QP"}"#).await;
    queue.push_raw("garbage").await;

    let messages = queue.receive(10).await.unwrap();
    for message in &messages {
        assert_eq!(dispatcher.handle_message(message).await, Disposition::Malformed);
    }

    assert!(queue.is_empty().await);
    assert_eq!(email.calls(), 0);
}

#[tokio::test]
async fn test_replayed_request_is_sent_twice() {
    let (dispatcher, queue, email) = dispatcher(MockEmailService::accepting());
    let req = request("a@example.com", "X7K2QP");
    queue.enqueue(&req).await.unwrap();
    queue.enqueue(&req).await.unwrap();

    let report = dispatcher.process_batch(&queue.receive(10).await.unwrap()).await;

    assert_eq!(report.counts.delivered, 2);
    assert_eq!(email.sent_to("a@example.com").len(), 2);
    assert!(queue.is_empty().await);
}

#[tokio::test]
async fn test_failed_acknowledge_is_not_surfaced() {
    let queue = Arc::new(AckFailingQueue::new(MemoryDeliveryQueue::new(VISIBILITY)));
    let email = Arc::new(MockEmailService::accepting());
    let dispatcher = EmailDispatcher::new(queue.clone(), email.clone(), EmailDispatcherConfig::default());
    queue.enqueue(&request("a@example.com", "X7K2QP")).await.unwrap();

    let messages = queue.receive(1).await.unwrap();
    let disposition = dispatcher.handle_message(&messages[0]).await;

    assert_eq!(disposition, Disposition::Delivered);
    assert_eq!(queue.ack_attempts.load(Ordering::SeqCst), 1);
    // Still queued; redelivery produces a tolerated duplicate
    assert_eq!(queue.inner.len().await, 1);
}

#[tokio::test]
async fn test_process_batch_reports_unacknowledged_ids() {
    let email = MockEmailService::accepting()
        .then_accept()
        .then_fail(ProviderErrorCode::Unavailable)
        .then_fail(ProviderErrorCode::Rejected);
    let (dispatcher, queue, _email) = dispatcher(email);

    queue.enqueue(&request("a@example.com", "AAAAAA")).await.unwrap();
    let retry_id = queue.enqueue(&request("b@example.com", "BBBBBB")).await.unwrap();
    queue.enqueue(&request("c@example.com", "CCCCCC")).await.unwrap();
    queue.push_raw("{}").await;

    let report = dispatcher.process_batch(&queue.receive(10).await.unwrap()).await;

    assert_eq!(report.counts.delivered, 1);
    assert_eq!(report.counts.retried, 1);
    assert_eq!(report.counts.rejected, 1);
    assert_eq!(report.counts.malformed, 1);
    assert_eq!(report.unacknowledged, vec![retry_id]);
    assert_eq!(queue.len().await, 1);
}

#[tokio::test]
async fn test_custom_classifier_makes_code_permanent() {
    let queue = Arc::new(MemoryDeliveryQueue::new(VISIBILITY));
    let email = Arc::new(MockEmailService::failing(ProviderErrorCode::Other(
        "MailboxFull".to_string(),
    )));
    let classifier = DefaultErrorClassifier::new().with_permanent_code("MailboxFull");
    let dispatcher = EmailDispatcher::new(queue.clone(), email, EmailDispatcherConfig::default())
        .with_classifier(Arc::new(classifier));
    queue.enqueue(&request("a@example.com", "X7K2QP")).await.unwrap();

    let messages = queue.receive(1).await.unwrap();
    assert_eq!(dispatcher.handle_message(&messages[0]).await, Disposition::Rejected);
}
