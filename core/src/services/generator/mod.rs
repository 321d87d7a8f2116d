//! Code generator service module
//!
//! Issues a verification code for an identifier, stores it with a lifetime
//! in the code store and enqueues exactly one delivery request for it.

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::CodeGeneratorConfig;
pub use service::CodeGeneratorService;
