//! Test module for determinism, integration and property tests.
//!
//! This module exercises the engine end to end:
//! - **Determinism tests**: same seed and same inputs give identical frames
//! - **Integration tests**: full frames through firing, combat and scoring
//! - **Property tests**: invariants of vehicles, weapons and collision
//! - **Helper functions**: engine factories, scripted agents, recorders
//!
//! # Test Structure
//!
//! - `determinism.rs`: Tests that verify deterministic execution
//! - `integration.rs`: End-to-end tests of the frame loop
//! - `properties.rs`: proptest invariants
//! - `helpers.rs`: Test setup utilities and factory functions

mod helpers;
mod properties;

// Re-export for convenience
pub use helpers::*;
