//! Mock email provider
//!
//! Logs verification emails instead of sending them. Used in development and
//! whenever no real provider can be initialised.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use mc_core::domain::value_objects::EmailContent;
use mc_core::errors::{ProviderError, ProviderErrorCode};
use mc_core::services::dispatch::EmailServiceTrait;
use mc_shared::utils::email::{is_valid_email, mask_email};

/// Log-only email provider
#[derive(Clone, Default)]
pub struct MockEmailService {
    /// Number of emails accepted
    message_count: Arc<AtomicU64>,
    /// Reject every send as throttled
    simulate_failure: bool,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock that fails every send with a transient error
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// Get the total number of emails accepted
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmailServiceTrait for MockEmailService {
    async fn send_email(&self, to: &str, content: &EmailContent) -> Result<String, ProviderError> {
        if !is_valid_email(to) {
            return Err(ProviderError::new(
                self.provider_name(),
                ProviderErrorCode::InvalidAddress,
                format!("invalid recipient {}", mask_email(to)),
            ));
        }

        if self.simulate_failure {
            return Err(ProviderError::new(
                self.provider_name(),
                ProviderErrorCode::Throttled,
                "simulated failure",
            ));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        self.message_count.fetch_add(1, Ordering::SeqCst);

        info!(
            to = %mask_email(to),
            subject = %content.subject,
            message_id = %message_id,
            event = "mock_email_sent",
            "Mock email provider accepted message"
        );
        debug!(text = %content.text_body, "Mock email body");

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}
