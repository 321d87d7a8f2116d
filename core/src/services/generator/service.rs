//! Main code generator service implementation

use std::sync::Arc;
use tracing::Instrument;

use mc_shared::utils::email::{is_valid_email, mask_email};

use crate::domain::entities::{DeliveryRequest, VerificationCode, VerificationRequest};
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{CodeStore, DeliveryQueue};

use super::config::CodeGeneratorConfig;

/// Issues codes and hands them to the delivery queue
///
/// Stateless apart from the injected clients; safe to call concurrently.
pub struct CodeGeneratorService<S: ?Sized, Q: ?Sized> {
    /// Store holding the current code per identifier
    store: Arc<S>,
    /// Queue feeding the email dispatcher
    queue: Arc<Q>,
    /// Service configuration
    config: CodeGeneratorConfig,
}

impl<S, Q> CodeGeneratorService<S, Q>
where
    S: CodeStore + ?Sized,
    Q: DeliveryQueue + ?Sized,
{
    /// Create a new code generator service
    ///
    /// # Arguments
    ///
    /// * `store` - Code store implementation
    /// * `queue` - Delivery queue implementation
    /// * `config` - Service configuration
    pub fn new(store: Arc<S>, queue: Arc<Q>, config: CodeGeneratorConfig) -> Self {
        Self { store, queue, config }
    }

    pub fn config(&self) -> &CodeGeneratorConfig {
        &self.config
    }

    /// Issue a new code for `identifier`
    ///
    /// This method:
    /// 1. Validates the identifier as an email address
    /// 2. Draws a code from the OS random source
    /// 3. Stores it, replacing any previous code for the identifier
    /// 4. Enqueues one delivery request carrying the code
    ///
    /// A failed enqueue leaves the new code in the store; calling again
    /// overwrites it, so the whole call can be retried.
    ///
    /// # Returns
    ///
    /// * `Ok(VerificationCode)` - The issued code
    /// * `Err(DomainError::InvalidIdentifier)` - Nothing was stored or enqueued
    /// * `Err(DomainError::StoreUnavailable)` - Nothing was enqueued
    /// * `Err(DomainError::DeliveryEnqueueFailed)` - Code stored, not enqueued
    pub async fn generate_code(&self, identifier: &str) -> DomainResult<VerificationCode> {
        Self::validate_identifier(identifier)?;
        let masked = mask_email(identifier);

        let value = VerificationCode::generate_value(self.config.code_length, self.config.charset);
        let code = VerificationCode::new(identifier, value, self.config.ttl_seconds);

        self.store
            .set(identifier, &code.value, self.config.ttl_seconds)
            .await
            .map_err(|e| {
                tracing::error!(
                    identifier = %masked,
                    error = %e,
                    event = "code_store_failed",
                    "Failed to store verification code"
                );
                match e {
                    DomainError::StoreUnavailable { .. } => e,
                    other => DomainError::StoreUnavailable {
                        message: other.to_string(),
                    },
                }
            })?;

        let request = DeliveryRequest::for_code(&code);
        let message_id = self.queue.enqueue(&request).await.map_err(|e| {
            tracing::error!(
                identifier = %masked,
                error = %e,
                event = "delivery_enqueue_failed",
                "Stored verification code but failed to enqueue its delivery"
            );
            match e {
                DomainError::DeliveryEnqueueFailed { .. } => e,
                other => DomainError::DeliveryEnqueueFailed {
                    message: other.to_string(),
                },
            }
        })?;

        tracing::info!(
            identifier = %masked,
            message_id = %message_id,
            expires_at = %code.expires_at,
            event = "code_generated",
            "Generated verification code and enqueued delivery"
        );

        Ok(code)
    }

    /// Entry point for trigger adapters carrying a [`VerificationRequest`]
    pub async fn handle_request(&self, request: VerificationRequest) -> DomainResult<VerificationCode> {
        let span = tracing::info_span!(
            "verification_request",
            identifier = %mask_email(&request.identifier),
            requested_at = %request.requested_at,
        );
        self.generate_code(&request.identifier).instrument(span).await
    }

    fn validate_identifier(identifier: &str) -> DomainResult<()> {
        if identifier.trim().is_empty() {
            return Err(DomainError::InvalidIdentifier {
                reason: "identifier must not be empty".to_string(),
            });
        }
        if !is_valid_email(identifier) {
            tracing::warn!(
                identifier = %mask_email(identifier),
                event = "invalid_identifier",
                "Rejected verification request for malformed identifier"
            );
            return Err(DomainError::InvalidIdentifier {
                reason: "identifier is not a valid email address".to_string(),
            });
        }
        Ok(())
    }
}
