//! Integration tests for perm-optimizer
//!
//! These tests drive the public API against real in-memory inventories
//! without mocking.

pub mod optimizer_tests;
pub mod snapshot_tests;
