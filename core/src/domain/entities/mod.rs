//! Domain entities representing core business objects.

pub mod delivery_request;
pub mod verification_code;
pub mod verification_request;

// Re-export commonly used types
pub use delivery_request::DeliveryRequest;
pub use verification_code::{VerificationCode, DEFAULT_CODE_LENGTH, DEFAULT_TTL_SECONDS};
pub use verification_request::VerificationRequest;
