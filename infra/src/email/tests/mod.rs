//! Tests for the email providers

#[cfg(all(test, feature = "aws-ses"))]
mod ses_tests;
