//! Delivery request carried on the delivery queue.
//!
//! Wire format is JSON with camelCase field names:
//! `{"identifier": "...", "code": "...", "enqueuedAt": "...", "deliveryAttempt": 0}`.
//! Bodies written by older producers use `email` instead of `identifier` and
//! omit the last two fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mc_shared::utils::email::is_valid_email;
use mc_shared::utils::validation::{Validate, ValidationErrors};

use crate::errors::{DomainError, DomainResult};

use super::verification_code::VerificationCode;

/// Request to email a code to an identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRequest {
    /// Recipient email address
    #[serde(alias = "email")]
    pub identifier: String,

    /// Code to deliver
    pub code: String,

    /// When the request was put on the queue
    #[serde(default = "Utc::now")]
    pub enqueued_at: DateTime<Utc>,

    /// Attempts already spent before this message was enqueued
    #[serde(default)]
    pub delivery_attempt: u32,
}

impl DeliveryRequest {
    /// First delivery request for a freshly issued code
    pub fn for_code(code: &VerificationCode) -> Self {
        Self {
            identifier: code.identifier.clone(),
            code: code.value.clone(),
            enqueued_at: Utc::now(),
            delivery_attempt: 0,
        }
    }

    /// Serialize into a queue message body
    pub fn encode(&self) -> DomainResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode and validate a queue message body
    pub fn decode(body: &str) -> DomainResult<Self> {
        let request: DeliveryRequest = serde_json::from_str(body)?;
        request.validate().map_err(|errors| DomainError::InvalidMessage {
            message: errors.to_string(),
        })?;
        Ok(request)
    }

    /// Attempt number of a dispatch given the queue's receive count
    ///
    /// The first receive of a fresh request is attempt 1.
    pub fn attempt_number(&self, receive_count: u32) -> u32 {
        self.delivery_attempt.saturating_add(receive_count.max(1))
    }
}

impl Validate for DeliveryRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            is_valid_email(&self.identifier),
            "identifier",
            "must be a valid email address",
        );
        errors.check(
            !self.code.is_empty() && self.code.chars().all(|c| c.is_ascii_alphanumeric()),
            "code",
            "must be a non-empty alphanumeric string",
        );
        errors.into_result()
    }
}
