//! Crate-level scenario tests.
//!
//! - **Integration tests**: whole-frame behavior through `World` and `Game`
//! - **Determinism tests**: same seed + same input + same clock readings
//!   produce identical state
//! - **Helper functions**: shared world and game factories
//!
//! # Test Structure
//!
//! - `integration.rs`: end-to-end gameplay scenarios
//! - `determinism.rs`: replay checks over serialized snapshots
//! - `helpers.rs`: setup utilities

mod helpers;
mod integration;

pub use helpers::*;
