//! Trait for email provider integration

use async_trait::async_trait;

use crate::domain::value_objects::EmailContent;
use crate::errors::ProviderError;

/// Trait for email provider integration
#[async_trait]
pub trait EmailServiceTrait: Send + Sync {
    /// Send an email to `to`
    ///
    /// Returns the provider's message id on acceptance.
    async fn send_email(&self, to: &str, content: &EmailContent) -> Result<String, ProviderError>;

    /// Short provider name used in logs and errors
    fn provider_name(&self) -> &str;
}
