//! Cache module for Redis-based storage
//!
//! Provides the Redis client with retry and timeouts, and the verification
//! code store built on it.

pub mod code_store;
pub mod redis_client;

#[cfg(test)]
mod tests;

pub use code_store::{RedisCodeStore, CODE_KEY_PREFIX};
pub use redis_client::RedisClient;

// Re-export commonly used types
pub use mc_shared::config::CacheConfig;
