//! Fake tools for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use crate::context::RunContext;
use crate::errors::ToolError;
use crate::tools::{ids, Tool, ToolOutput, ToolRegistry};

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// The input string the tool received.
    pub input: String,
    /// Run the call belonged to.
    pub run_id: uuid::Uuid,
}

/// A tool that succeeds, records every call, and can publish fixed artifacts.
#[derive(Debug)]
pub struct RecordingTool {
    name: String,
    artifacts: BTreeMap<String, String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingTool {
    /// Creates a recording tool.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artifacts: BTreeMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Publishes an artifact on every successful call.
    #[must_use]
    pub fn with_artifact(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.artifacts.insert(name.into(), value.into());
        self
    }

    /// Returns the number of invocations.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Returns every recorded call.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Returns the inputs received, in order.
    #[must_use]
    pub fn inputs(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.input.clone()).collect()
    }

    /// Clears recorded calls.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

#[async_trait]
impl Tool for RecordingTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Records its input"
    }

    async fn invoke(&self, ctx: &RunContext, input: &str) -> Result<ToolOutput, ToolError> {
        self.calls.lock().push(RecordedCall {
            input: input.to_string(),
            run_id: ctx.run_id(),
        });
        Ok(ToolOutput {
            message: format!("{} handled '{input}'", self.name),
            artifacts: self.artifacts.clone(),
        })
    }
}

/// A tool that always fails.
#[derive(Debug)]
pub struct FailingTool {
    name: String,
    error: ToolError,
    calls: Mutex<usize>,
}

impl FailingTool {
    /// Creates a tool failing with an execution error.
    #[must_use]
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            error: ToolError::execution_failed(name.clone(), reason),
            name,
            calls: Mutex::new(0),
        }
    }

    /// Creates a tool that rejects its input.
    #[must_use]
    pub fn invalid_input(name: impl Into<String>, reason: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            error: ToolError::invalid_input(name.clone(), reason),
            name,
            calls: Mutex::new(0),
        }
    }

    /// Returns the number of invocations.
    #[must_use]
    pub fn call_count(&self) -> usize {
        *self.calls.lock()
    }
}

#[async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Always fails"
    }

    async fn invoke(&self, _ctx: &RunContext, _input: &str) -> Result<ToolOutput, ToolError> {
        *self.calls.lock() += 1;
        Err(self.error.clone())
    }
}

/// A tool that waits through the run context before succeeding.
#[derive(Debug)]
pub struct SlowTool {
    name: String,
    delay: Duration,
}

impl SlowTool {
    /// Creates a slow tool.
    #[must_use]
    pub fn new(name: impl Into<String>, delay: Duration) -> Self {
        Self {
            name: name.into(),
            delay,
        }
    }

    /// Creates a slow tool with delay in milliseconds.
    #[must_use]
    pub fn with_delay_ms(name: impl Into<String>, ms: u64) -> Self {
        Self::new(name, Duration::from_millis(ms))
    }
}

#[async_trait]
impl Tool for SlowTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Takes its time"
    }

    async fn invoke(&self, ctx: &RunContext, _input: &str) -> Result<ToolOutput, ToolError> {
        ctx.pause(self.delay)
            .await
            .map_err(|reason| ToolError::cancelled(&self.name, reason))?;
        Ok(ToolOutput::ok(format!("{} finished", self.name)))
    }
}

/// Handles to the recording fakes in a [`recording_registry`].
pub type ToolHandles = HashMap<&'static str, Arc<RecordingTool>>;

/// Builds a registry with a [`RecordingTool`] under every built-in identifier.
///
/// The downloader fake publishes `primary_media_path` like the real one.
#[must_use]
pub fn recording_registry() -> (ToolRegistry, ToolHandles) {
    let mut registry = ToolRegistry::new();
    let mut handles = HashMap::new();

    for id in [
        ids::DOWNLOADER,
        ids::EDITOR,
        ids::TRANSLATOR,
        ids::UPLOADER,
        ids::REPORTER,
        ids::NOTIFIER,
    ] {
        let mut tool = RecordingTool::new(id);
        if id == ids::DOWNLOADER {
            tool = tool.with_artifact(crate::context::PRIMARY_MEDIA_PATH, "fetched.mp4");
        }
        let tool = Arc::new(tool);
        registry.register(tool.clone());
        handles.insert(id, tool);
    }

    (registry, handles)
}
