//! Amazon SES (v2 API) email provider

use async_trait::async_trait;
use aws_sdk_sesv2::{
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    types::{Body, Content, Destination, EmailContent as SesEmailContent, Message},
    Client as SesClient,
};
use tracing::{debug, info};

use mc_core::domain::value_objects::EmailContent;
use mc_core::errors::{ProviderError, ProviderErrorCode};
use mc_core::services::dispatch::EmailServiceTrait;
use mc_shared::config::EmailConfig;
use mc_shared::utils::email::mask_email;

use crate::InfrastructureError;

const PROVIDER_NAME: &str = "ses";
const CHARSET: &str = "UTF-8";

/// SES email provider
#[derive(Clone)]
pub struct SesEmailService {
    client: SesClient,
    /// Formatted From address, with display name when configured
    from_address: String,
}

impl SesEmailService {
    /// Create the provider using the default AWS credential chain
    pub async fn new(config: &EmailConfig) -> Result<Self, InfrastructureError> {
        if config.sender.trim().is_empty() {
            return Err(InfrastructureError::Config(
                "email.sender is required for SES".to_string(),
            ));
        }

        let sdk_config = crate::aws::load_sdk_config(&config.region, None).await;
        info!(
            region = %config.region,
            event = "ses_provider_initialized",
            "SES email provider initialized"
        );

        Ok(Self::from_client(SesClient::new(&sdk_config), config))
    }

    /// Wrap an existing SDK client
    pub fn from_client(client: SesClient, config: &EmailConfig) -> Self {
        Self {
            client,
            from_address: from_address(&config.sender, config.sender_name.as_deref()),
        }
    }

    fn build_content(content: &EmailContent) -> Result<SesEmailContent, ProviderError> {
        let text = |data: &str| {
            Content::builder()
                .data(data)
                .charset(CHARSET)
                .build()
                .map_err(|e| {
                    ProviderError::new(
                        PROVIDER_NAME,
                        ProviderErrorCode::Other("build_error".to_string()),
                        e.to_string(),
                    )
                })
        };

        let body = Body::builder()
            .html(text(&content.html_body)?)
            .text(text(&content.text_body)?)
            .build();
        let message = Message::builder()
            .subject(text(&content.subject)?)
            .body(body)
            .build();

        Ok(SesEmailContent::builder().simple(message).build())
    }
}

#[async_trait]
impl EmailServiceTrait for SesEmailService {
    async fn send_email(&self, to: &str, content: &EmailContent) -> Result<String, ProviderError> {
        debug!(to = %mask_email(to), "Sending email via SES");

        let output = self
            .client
            .send_email()
            .from_email_address(&self.from_address)
            .destination(Destination::builder().to_addresses(to).build())
            .content(Self::build_content(content)?)
            .send()
            .await
            .map_err(|e| {
                let code = match &e {
                    SdkError::TimeoutError(_) => ProviderErrorCode::Timeout,
                    SdkError::DispatchFailure(_) => ProviderErrorCode::Network,
                    other => code_for_service_error(other.as_service_error().and_then(|e| e.code())),
                };
                ProviderError::new(PROVIDER_NAME, code, DisplayErrorContext(&e).to_string())
            })?;

        Ok(output.message_id().unwrap_or_default().to_string())
    }

    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }
}

/// Map an SES error code onto a provider error code
pub(crate) fn code_for_service_error(code: Option<&str>) -> ProviderErrorCode {
    match code {
        Some("MessageRejected")
        | Some("MailFromDomainNotVerifiedException")
        | Some("NotFoundException") => ProviderErrorCode::Rejected,
        Some("AccountSuspendedException") | Some("SendingPausedException") => {
            ProviderErrorCode::AccountSuspended
        }
        Some("TooManyRequestsException")
        | Some("LimitExceededException")
        | Some("Throttling")
        | Some("ThrottlingException") => ProviderErrorCode::Throttled,
        Some("BadRequestException") => ProviderErrorCode::InvalidAddress,
        Some("InternalFailure") | Some("ServiceUnavailable") => ProviderErrorCode::Unavailable,
        Some(other) => ProviderErrorCode::Other(other.to_string()),
        None => ProviderErrorCode::Unavailable,
    }
}

/// `Name <address>` when a display name is configured
pub(crate) fn from_address(sender: &str, sender_name: Option<&str>) -> String {
    match sender_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => format!("{} <{}>", name, sender),
        None => sender.to_string(),
    }
}
