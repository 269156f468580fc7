//! Integration test crate for Ascendia.
//!
//! This crate has no library code. It only contains integration tests that
//! drive the engine end to end against in-memory SQLite: day reconciliation
//! across gaps, streak continuity, completion idempotency and the
//! all-users sweep.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p ascendia-integration-tests
//! ```
