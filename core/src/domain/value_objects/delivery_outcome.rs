//! Result of a single dispatch attempt.

use std::fmt;

/// Outcome of handing one delivery request to the email provider
///
/// Drives the acknowledge decision: `Sent` and `PermanentFailure` are
/// acknowledged, `TransientFailure` is left for redelivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Provider accepted the email
    Sent { message_id: String },
    /// Retrying later may succeed
    TransientFailure { reason: String },
    /// Retrying will not help
    PermanentFailure { reason: String },
}

impl DeliveryOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DeliveryOutcome::Sent { .. })
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, DeliveryOutcome::TransientFailure { .. })
    }

    pub fn is_permanent(&self) -> bool {
        matches!(self, DeliveryOutcome::PermanentFailure { .. })
    }

    /// Short label used in log fields
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryOutcome::Sent { .. } => "sent",
            DeliveryOutcome::TransientFailure { .. } => "transient_failure",
            DeliveryOutcome::PermanentFailure { .. } => "permanent_failure",
        }
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryOutcome::Sent { message_id } => write!(f, "sent ({})", message_id),
            DeliveryOutcome::TransientFailure { reason } => write!(f, "transient failure: {}", reason),
            DeliveryOutcome::PermanentFailure { reason } => write!(f, "permanent failure: {}", reason),
        }
    }
}
