//! JSON-over-HTTP transactional email provider
//!
//! Speaks the Brevo `POST /v3/smtp/email` dialect: an `api-key` header and a
//! JSON body with `sender`, `to`, `subject`, `htmlContent` and `textContent`.
//! A 2xx answer carries the provider `messageId`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use mc_core::domain::value_objects::EmailContent;
use mc_core::errors::{ProviderError, ProviderErrorCode};
use mc_core::services::dispatch::EmailServiceTrait;
use mc_shared::config::EmailConfig;
use mc_shared::utils::email::mask_email;

use crate::InfrastructureError;

const PROVIDER_NAME: &str = "http";

/// Default whole-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
pub(crate) struct Party<'a> {
    pub email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SendEmailPayload<'a> {
    pub sender: Party<'a>,
    pub to: Vec<Party<'a>>,
    pub subject: &'a str,
    pub html_content: &'a str,
    pub text_content: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailResponse {
    message_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Email provider for Brevo-compatible HTTP APIs
#[derive(Clone)]
pub struct HttpEmailService {
    client: Client,
    endpoint: String,
    api_key: String,
    sender: String,
    sender_name: Option<String>,
}

impl HttpEmailService {
    pub fn new(config: &EmailConfig) -> Result<Self, InfrastructureError> {
        Self::with_timeout(config, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create the provider with a custom request timeout
    pub fn with_timeout(config: &EmailConfig, timeout: Duration) -> Result<Self, InfrastructureError> {
        let api_key = config
            .http_api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| InfrastructureError::Config("email.http_api_key is required".to_string()))?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: config.http_endpoint.clone(),
            api_key,
            sender: config.sender.clone(),
            sender_name: config.sender_name.clone(),
        })
    }

    pub(crate) fn payload<'a>(&'a self, to: &'a str, content: &'a EmailContent) -> SendEmailPayload<'a> {
        SendEmailPayload {
            sender: Party {
                email: &self.sender,
                name: self.sender_name.as_deref(),
            },
            to: vec![Party { email: to, name: None }],
            subject: &content.subject,
            html_content: &content.html_body,
            text_content: &content.text_body,
        }
    }
}

#[async_trait]
impl EmailServiceTrait for HttpEmailService {
    async fn send_email(&self, to: &str, content: &EmailContent) -> Result<String, ProviderError> {
        debug!(to = %mask_email(to), "Sending email via HTTP provider");

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&self.payload(to, content))
            .send()
            .await
            .map_err(|e| ProviderError::new(PROVIDER_NAME, code_for_transport_error(&e), e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let body: SendEmailResponse = response.json().await.map_err(|e| {
                ProviderError::new(
                    PROVIDER_NAME,
                    ProviderErrorCode::Other("invalid_response".to_string()),
                    e.to_string(),
                )
            })?;
            return Ok(body.message_id.unwrap_or_default());
        }

        let text = response.text().await.unwrap_or_default();
        let error_body: ApiErrorBody = serde_json::from_str(&text).unwrap_or_default();
        let code = code_for_status(status);

        warn!(
            status = status.as_u16(),
            provider_code = error_body.code.as_deref().unwrap_or(""),
            to = %mask_email(to),
            "HTTP email provider refused message"
        );

        Err(ProviderError::new(
            PROVIDER_NAME,
            code,
            error_body
                .message
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
        ))
    }

    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }
}

/// Map a non-success HTTP status onto a provider error code
pub(crate) fn code_for_status(status: StatusCode) -> ProviderErrorCode {
    match status.as_u16() {
        400 | 422 => ProviderErrorCode::InvalidAddress,
        401 | 402 | 403 => ProviderErrorCode::AccountSuspended,
        408 => ProviderErrorCode::Timeout,
        429 => ProviderErrorCode::Throttled,
        500..=599 => ProviderErrorCode::Unavailable,
        other => ProviderErrorCode::Other(format!("http_{}", other)),
    }
}

pub(crate) fn code_for_transport_error(error: &reqwest::Error) -> ProviderErrorCode {
    if error.is_timeout() {
        ProviderErrorCode::Timeout
    } else {
        ProviderErrorCode::Network
    }
}
