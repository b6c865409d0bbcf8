//! Tools the planner can bind steps to.
//!
//! This module provides:
//! - The [`Tool`] capability and the [`ToolRegistry`] it is looked up in
//! - Tool output and definition types
//! - The built-in video tools

pub mod builtin;
mod definitions;
mod registry;

pub use builtin::{builtin_registry, ids};
pub use definitions::{ToolDefinition, ToolOutput};
pub use registry::{Tool, ToolRegistry};
