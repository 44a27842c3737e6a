//! Shared test utilities for modernizer integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated runs with temp directories
//! - Scripted oracle and validator doubles
//! - Builders for configs and jobs

pub mod builders;
pub mod harness;
pub mod scripted;

pub use builders::*;
pub use harness::TestHarness;
pub use scripted::{Reply, ScriptedOracle, ScriptedValidator};
