//! Error types for the intentflow engine.
//!
//! Every request surfaces at most one [`IntentflowError`]. Tool implementations
//! report failures through [`ToolError`], which the executor wraps with the
//! position of the failing step.

use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for intentflow operations.
#[derive(Debug, Error)]
pub enum IntentflowError {
    /// No plan could be derived from the request text.
    #[error("Could not derive a plan from the request: no actionable workflow steps")]
    Unplannable,

    /// A step referenced a tool that is not registered.
    #[error("Step {step}: tool '{tool}' is not registered")]
    UnknownTool {
        /// 1-based step index.
        step: usize,
        /// The tool identifier from the plan.
        tool: String,
    },

    /// A step referenced an artifact that no earlier step produced.
    #[error("Step {step}: artifact '{name}' is not available")]
    MissingArtifact {
        /// 1-based step index.
        step: usize,
        /// The artifact name.
        name: String,
    },

    /// A tool invocation returned an error.
    #[error("Step {step}/{total} ({tool}) failed: {source}")]
    StepFailed {
        /// 1-based step index.
        step: usize,
        /// Number of steps in the plan.
        total: usize,
        /// The tool identifier.
        tool: String,
        /// The underlying tool error.
        #[source]
        source: ToolError,
    },

    /// The request was cancelled or ran past its deadline.
    #[error("Workflow cancelled at step {step}: {reason}")]
    Cancelled {
        /// 1-based index of the step that did not complete.
        step: usize,
        /// Why the run stopped.
        reason: String,
    },

    /// Configuration could not be loaded or was invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntentflowError {
    /// Creates a step failure error.
    #[must_use]
    pub fn step_failed(step: usize, total: usize, tool: impl Into<String>, source: ToolError) -> Self {
        Self::StepFailed {
            step,
            total,
            tool: tool.into(),
            source,
        }
    }

    /// Creates a cancellation error.
    #[must_use]
    pub fn cancelled(step: usize, reason: impl Into<String>) -> Self {
        Self::Cancelled {
            step,
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns a stable code for the error kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unplannable => "unplannable",
            Self::UnknownTool { .. } => "unknown_tool",
            Self::MissingArtifact { .. } => "missing_artifact",
            Self::StepFailed { .. } => "step_failed",
            Self::Cancelled { .. } => "cancelled",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
        }
    }

    /// Returns true if the request stopped because of cancellation or a deadline.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Returns the 1-based step index the error is attached to, if any.
    #[must_use]
    pub fn step(&self) -> Option<usize> {
        match self {
            Self::UnknownTool { step, .. }
            | Self::MissingArtifact { step, .. }
            | Self::StepFailed { step, .. }
            | Self::Cancelled { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), json!(self.kind()));
        map.insert("message".to_string(), json!(self.to_string()));
        if let Some(step) = self.step() {
            map.insert("step".to_string(), json!(step));
        }
        if let Self::StepFailed { tool, source, .. } = self {
            map.insert("tool".to_string(), json!(tool));
            map.insert(
                "cause".to_string(),
                serde_json::Value::Object(source.to_dict().into_iter().collect()),
            );
        }
        map
    }
}

/// Errors reported by tool invocations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    /// The input string did not match the tool's expected format.
    #[error("{tool}: invalid input - {reason}")]
    InvalidInput {
        /// The tool name.
        tool: String,
        /// What was wrong with the input.
        reason: String,
    },

    /// The tool ran but could not complete.
    #[error("{tool}: execution failed - {reason}")]
    ExecutionFailed {
        /// The tool name.
        tool: String,
        /// The reason for failure.
        reason: String,
    },

    /// The tool observed cancellation while running.
    #[error("{tool}: cancelled - {reason}")]
    Cancelled {
        /// The tool name.
        tool: String,
        /// The cancellation reason.
        reason: String,
    },
}

impl ToolError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Creates an execution failed error.
    #[must_use]
    pub fn execution_failed(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Creates a cancellation error.
    #[must_use]
    pub fn cancelled(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Cancelled {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Returns the name of the tool that produced the error.
    #[must_use]
    pub fn tool(&self) -> &str {
        match self {
            Self::InvalidInput { tool, .. }
            | Self::ExecutionFailed { tool, .. }
            | Self::Cancelled { tool, .. } => tool,
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();

        match self {
            Self::InvalidInput { tool, reason } => {
                map.insert("type".to_string(), json!("ToolInvalidInput"));
                map.insert("tool".to_string(), json!(tool));
                map.insert("reason".to_string(), json!(reason));
            }
            Self::ExecutionFailed { tool, reason } => {
                map.insert("type".to_string(), json!("ToolExecutionError"));
                map.insert("tool".to_string(), json!(tool));
                map.insert("reason".to_string(), json!(reason));
            }
            Self::Cancelled { tool, reason } => {
                map.insert("type".to_string(), json!("ToolCancelled"));
                map.insert("tool".to_string(), json!(tool));
                map.insert("reason".to_string(), json!(reason));
            }
        }

        map.insert("message".to_string(), json!(self.to_string()));
        map
    }
}

/// Result alias used across the crate.
pub type Result<T, E = IntentflowError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_failed_message_names_step_and_cause() {
        let err = IntentflowError::step_failed(
            2,
            3,
            "VideoEditor",
            ToolError::invalid_input("VideoEditor", "expected 'file;start;end'"),
        );

        let message = err.to_string();
        assert!(message.contains("Step 2/3"));
        assert!(message.contains("expected 'file;start;end'"));
        assert_eq!(err.step(), Some(2));
        assert_eq!(err.kind(), "step_failed");
    }

    #[test]
    fn test_source_chain_exposes_tool_error() {
        let err = IntentflowError::step_failed(1, 1, "t", ToolError::execution_failed("t", "boom"));
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("t: execution failed - boom"));
    }

    #[test]
    fn test_cancellation_helpers() {
        let err = IntentflowError::cancelled(1, "deadline exceeded");
        assert!(err.is_cancellation());
        assert!(!IntentflowError::Unplannable.is_cancellation());
        assert_eq!(IntentflowError::Unplannable.step(), None);
    }

    #[test]
    fn test_error_to_dict() {
        let err = IntentflowError::step_failed(1, 2, "EmailSender", ToolError::invalid_input("EmailSender", "bad"));
        let dict = err.to_dict();

        assert_eq!(dict.get("type").unwrap(), "step_failed");
        assert_eq!(dict.get("step").unwrap(), 1);
        assert_eq!(dict.get("tool").unwrap(), "EmailSender");
        assert_eq!(dict["cause"]["type"], "ToolInvalidInput");
    }

    #[test]
    fn test_tool_error_accessors() {
        let err = ToolError::cancelled("VideoDownloader", "interrupted");
        assert_eq!(err.tool(), "VideoDownloader");
        assert_eq!(err.to_dict().get("type").unwrap(), "ToolCancelled");
    }
}
