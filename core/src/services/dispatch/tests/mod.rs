//! Tests for the email dispatcher and worker pool

#[cfg(test)]
mod service_tests;
