//! Main email dispatcher implementation

use std::sync::Arc;
use tracing::Instrument;

use mc_shared::utils::email::mask_email;

use crate::domain::entities::DeliveryRequest;
use crate::domain::value_objects::{DeliveryOutcome, EmailContent};
use crate::repositories::{DeliveryQueue, ReceivedMessage};

use super::classifier::{DefaultErrorClassifier, ErrorClassifier, FailureKind};
use super::config::EmailDispatcherConfig;
use super::traits::EmailServiceTrait;
use super::types::{BatchReport, Disposition};

/// Consumes delivery requests and turns every outcome into an ack decision
///
/// No deduplication state is kept: a redelivered request is sent again.
/// Send failures never propagate to the caller.
pub struct EmailDispatcher<Q: ?Sized, E: ?Sized> {
    /// Queue the messages were received from
    queue: Arc<Q>,
    /// Email provider
    email_service: Arc<E>,
    /// Maps provider errors onto retry decisions
    classifier: Arc<dyn ErrorClassifier>,
    /// Dispatcher configuration
    config: EmailDispatcherConfig,
}

impl<Q, E> EmailDispatcher<Q, E>
where
    Q: DeliveryQueue + ?Sized,
    E: EmailServiceTrait + ?Sized,
{
    /// Create a dispatcher using [`DefaultErrorClassifier`]
    pub fn new(queue: Arc<Q>, email_service: Arc<E>, config: EmailDispatcherConfig) -> Self {
        Self {
            queue,
            email_service,
            classifier: Arc::new(DefaultErrorClassifier::new()),
            config,
        }
    }

    /// Replace the error classifier
    pub fn with_classifier(mut self, classifier: Arc<dyn ErrorClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn queue(&self) -> &Arc<Q> {
        &self.queue
    }

    pub fn config(&self) -> &EmailDispatcherConfig {
        &self.config
    }

    /// Send the code of `request` and classify the result
    ///
    /// A call exceeding the dispatch timeout is a transient failure. Stale
    /// or superseded codes are sent as is.
    pub async fn dispatch(&self, request: &DeliveryRequest) -> DeliveryOutcome {
        let content = EmailContent::verification(self.config.subject.as_str(), &request.code);
        let send = self.email_service.send_email(&request.identifier, &content);

        let outcome = match tokio::time::timeout(self.config.dispatch_timeout, send).await {
            Ok(Ok(message_id)) => DeliveryOutcome::Sent { message_id },
            Ok(Err(error)) => match self.classifier.classify(&error) {
                FailureKind::Transient => DeliveryOutcome::TransientFailure {
                    reason: error.to_string(),
                },
                FailureKind::Permanent => DeliveryOutcome::PermanentFailure {
                    reason: error.to_string(),
                },
            },
            Err(_) => DeliveryOutcome::TransientFailure {
                reason: format!(
                    "{} did not answer within {}ms",
                    self.email_service.provider_name(),
                    self.config.dispatch_timeout.as_millis()
                ),
            },
        };

        tracing::debug!(
            provider = self.email_service.provider_name(),
            outcome = outcome.label(),
            "Dispatch attempt finished"
        );
        outcome
    }

    /// Decode, dispatch and acknowledge one received message
    ///
    /// Acknowledges on success, on permanent failure, on undecodable bodies
    /// and on a transient failure at the last allowed attempt. Leaves other
    /// transient failures to the visibility timeout.
    pub async fn handle_message(&self, message: &ReceivedMessage) -> Disposition {
        let span = tracing::info_span!(
            "delivery",
            message_id = %message.message_id,
            receive_count = message.receive_count,
        );

        async {
            let request = match DeliveryRequest::decode(&message.body) {
                Ok(request) => request,
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        event = "malformed_delivery_dropped",
                        "Dropping delivery message that cannot be decoded"
                    );
                    self.acknowledge(message).await;
                    return Disposition::Malformed;
                }
            };

            let identifier = mask_email(&request.identifier);
            let attempt = request.attempt_number(message.receive_count);

            match self.dispatch(&request).await {
                DeliveryOutcome::Sent { message_id } => {
                    tracing::info!(
                        identifier = %identifier,
                        attempt = attempt,
                        provider_message_id = %message_id,
                        event = "code_delivered",
                        "Verification email accepted by provider"
                    );
                    self.acknowledge(message).await;
                    Disposition::Delivered
                }
                DeliveryOutcome::PermanentFailure { reason } => {
                    tracing::error!(
                        identifier = %identifier,
                        attempt = attempt,
                        reason = %reason,
                        event = "delivery_rejected",
                        "Verification email permanently rejected"
                    );
                    self.acknowledge(message).await;
                    Disposition::Rejected
                }
                DeliveryOutcome::TransientFailure { reason }
                    if attempt >= self.config.max_attempts =>
                {
                    tracing::error!(
                        identifier = %identifier,
                        attempt = attempt,
                        max_attempts = self.config.max_attempts,
                        reason = %reason,
                        event = "delivery_abandoned",
                        "Abandoning verification email after exhausting attempts"
                    );
                    self.acknowledge(message).await;
                    Disposition::Abandoned
                }
                DeliveryOutcome::TransientFailure { reason } => {
                    tracing::warn!(
                        identifier = %identifier,
                        attempt = attempt,
                        max_attempts = self.config.max_attempts,
                        reason = %reason,
                        event = "delivery_retry_pending",
                        "Verification email failed transiently, leaving for redelivery"
                    );
                    Disposition::Retry
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Handle a batch as delivered by a queue trigger
    ///
    /// Messages are handled in order; the report lists the ids left
    /// unacknowledged.
    pub async fn process_batch(&self, messages: &[ReceivedMessage]) -> BatchReport {
        let mut report = BatchReport::default();
        for message in messages {
            let disposition = self.handle_message(message).await;
            report.record(&message.message_id, disposition);
        }

        tracing::debug!(
            batch_size = messages.len(),
            unacknowledged = report.unacknowledged.len(),
            event = "batch_processed",
            "Processed delivery batch"
        );
        report
    }

    async fn acknowledge(&self, message: &ReceivedMessage) {
        if let Err(e) = self.queue.acknowledge(&message.receipt_handle).await {
            // Redelivery of an already handled message is a tolerated duplicate
            tracing::warn!(
                error = %e,
                event = "acknowledge_failed",
                "Failed to acknowledge delivery message"
            );
        }
    }
}
