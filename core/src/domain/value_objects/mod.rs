//! Value objects representing immutable domain concepts.

pub mod delivery_outcome;
pub mod email_content;

// Re-export commonly used types
pub use delivery_outcome::DeliveryOutcome;
pub use email_content::EmailContent;
