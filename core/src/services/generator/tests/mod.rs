//! Tests for the code generator service
