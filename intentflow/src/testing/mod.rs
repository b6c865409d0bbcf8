//! Testing utilities for intentflow workflows.
//!
//! This module provides:
//! - Fake tools that record, fail, or stall
//! - Registries of fakes standing in for the built-in tools

mod mocks;

pub use mocks::{
    recording_registry, FailingTool, RecordedCall, RecordingTool, SlowTool, ToolHandles,
};
