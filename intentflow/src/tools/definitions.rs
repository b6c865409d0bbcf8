//! Tool definitions and I/O types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Description of a registered tool, used for capability listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool identifier.
    pub name: String,
    /// What the tool does and what input it expects.
    pub description: String,
}

impl ToolDefinition {
    /// Creates a new tool definition.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Output from a successful tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Human-readable result.
    pub message: String,
    /// Named values for later steps.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub artifacts: BTreeMap<String, String>,
}

impl ToolOutput {
    /// Creates an output carrying only a message.
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            artifacts: BTreeMap::new(),
        }
    }

    /// Adds a named artifact.
    #[must_use]
    pub fn with_artifact(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.artifacts.insert(name.into(), value.into());
        self
    }
}
