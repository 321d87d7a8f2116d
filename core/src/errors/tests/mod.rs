//! Tests for domain and provider errors

mod domain_error_tests;
