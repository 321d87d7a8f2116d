//! # MailCode Core
//!
//! Domain layer of the email verification-code pipeline.
//! This crate contains domain entities, the error taxonomy, the code store
//! and delivery queue interfaces, the code generator and the email
//! dispatcher with its worker pool.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
