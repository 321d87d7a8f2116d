//! Email provider configuration module

use serde::{Deserialize, Serialize};

use super::environment::Environment;
use super::queue::default_region;

/// Email provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmailProviderKind {
    /// Amazon SES (v2 API)
    Ses,
    /// JSON-over-HTTP transactional API (Brevo-compatible)
    Http,
    /// Log-only provider for development
    #[default]
    Mock,
}

/// Email provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    /// Provider implementation
    #[serde(default)]
    pub provider: EmailProviderKind,

    /// From address; must be verified with the provider
    #[serde(default = "default_sender")]
    pub sender: String,

    /// Optional display name for the From address
    #[serde(default)]
    pub sender_name: Option<String>,

    /// Subject line of verification emails
    #[serde(default = "default_subject")]
    pub subject: String,

    /// AWS region (SES)
    #[serde(default = "default_region")]
    pub region: String,

    /// Endpoint of the HTTP provider
    #[serde(default = "default_http_endpoint")]
    pub http_endpoint: String,

    /// API key of the HTTP provider
    #[serde(default)]
    pub http_api_key: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: EmailProviderKind::default(),
            sender: default_sender(),
            sender_name: None,
            subject: default_subject(),
            region: default_region(),
            http_endpoint: default_http_endpoint(),
            http_api_key: None,
        }
    }
}

impl EmailConfig {
    /// Defaults for an environment; only development sends nowhere
    pub fn for_environment(environment: Environment) -> Self {
        let provider = if environment.is_development() {
            EmailProviderKind::Mock
        } else {
            EmailProviderKind::Ses
        };
        Self {
            provider,
            ..Self::default()
        }
    }
}

fn default_sender() -> String {
    String::from("no-reply@example.com")
}

fn default_subject() -> String {
    String::from("Your verification code")
}

fn default_http_endpoint() -> String {
    String::from("https://api.brevo.com/v3/smtp/email")
}
