//! Outreach Engine - Orchestration layer
//!
//! Command functions that check the caller, coordinate core rules with the
//! store, and own lifecycle logging for every operation.

pub mod commands;

pub use commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
