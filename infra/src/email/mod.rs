//! Email Provider Module
//!
//! Implementations of [`EmailServiceTrait`] for sending verification codes:
//!
//! - **SES**: Amazon SES v2 (feature `aws-ses`)
//! - **HTTP**: Brevo-compatible transactional API over reqwest
//! - **Mock**: logs instead of sending, for development

use std::sync::Arc;

use mc_core::services::dispatch::EmailServiceTrait;
use mc_shared::config::{EmailConfig, EmailProviderKind, Environment};

use crate::InfrastructureError;

pub mod http_api;
pub mod mock_email;

#[cfg(feature = "aws-ses")]
pub mod ses;

pub use http_api::HttpEmailService;
pub use mock_email::MockEmailService;

#[cfg(feature = "aws-ses")]
pub use ses::SesEmailService;

#[cfg(test)]
mod tests;

/// Create an email provider based on configuration
///
/// In development a provider that cannot be initialised (or is not compiled
/// in) is replaced by [`MockEmailService`]. Elsewhere that is an error, and so
/// is selecting the mock provider at all, since it acknowledges every message
/// without sending anything.
pub async fn create_email_service(
    config: &EmailConfig,
    environment: Environment,
) -> Result<Arc<dyn EmailServiceTrait>, InfrastructureError> {
    let result: Result<Arc<dyn EmailServiceTrait>, InfrastructureError> = match config.provider {
        EmailProviderKind::Mock if environment.is_development() => {
            return Ok(Arc::new(MockEmailService::new()));
        }
        EmailProviderKind::Mock => {
            return Err(InfrastructureError::Config(format!(
                "mock email provider is not allowed in {}",
                environment
            )));
        }
        EmailProviderKind::Http => HttpEmailService::new(config)
            .map(|service| Arc::new(service) as Arc<dyn EmailServiceTrait>),
        #[cfg(feature = "aws-ses")]
        EmailProviderKind::Ses => SesEmailService::new(config)
            .await
            .map(|service| Arc::new(service) as Arc<dyn EmailServiceTrait>),
        #[cfg(not(feature = "aws-ses"))]
        EmailProviderKind::Ses => Err(InfrastructureError::Config(
            "SES support not compiled in".to_string(),
        )),
    };

    match result {
        Ok(service) => Ok(service),
        Err(e) if environment.is_development() => {
            tracing::error!("Failed to initialize {:?} email provider: {}", config.provider, e);
            tracing::warn!("Falling back to mock email provider");
            Ok(Arc::new(MockEmailService::new()))
        }
        Err(e) => {
            tracing::error!(
                provider = ?config.provider,
                error = %e,
                event = "email_provider_init_failed",
                "Failed to initialize email provider"
            );
            Err(e)
        }
    }
}
