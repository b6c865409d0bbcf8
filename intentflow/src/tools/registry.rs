//! Tool registry for managing tool instances.

use super::ToolDefinition;
use super::ToolOutput;
use crate::context::RunContext;
use crate::errors::ToolError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Trait for tool implementations.
///
/// Tools are stateless: an invocation depends only on its input string.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool's identifier.
    fn name(&self) -> &str;

    /// Returns a description of the tool and its input format.
    fn description(&self) -> &str;

    /// Invokes the tool.
    async fn invoke(&self, ctx: &RunContext, input: &str) -> Result<ToolOutput, ToolError>;
}

/// Lookup table from tool identifier to tool.
///
/// Built once at composition time and shared read-only behind an `Arc`.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool under its own name, returning any tool it replaced.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Option<Arc<dyn Tool>> {
        self.tools.insert(tool.name().to_string(), tool)
    }

    /// Registers a tool, builder style.
    #[must_use]
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    /// Gets a tool by identifier.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Checks if a tool is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns true if no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Lists registered tool identifiers, sorted.
    #[must_use]
    pub fn list_tools(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Lists tool definitions, sorted by name.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self
            .tools
            .values()
            .map(|tool| ToolDefinition::new(tool.name(), tool.description()))
            .collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.list_tools())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool {
        name: String,
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            &self.name
        }

        fn description(&self) -> &str {
            "Echoes its input"
        }

        async fn invoke(&self, _ctx: &RunContext, input: &str) -> Result<ToolOutput, ToolError> {
            Ok(ToolOutput::ok(input))
        }
    }

    fn echo(name: &str) -> Arc<dyn Tool> {
        Arc::new(EchoTool {
            name: name.to_string(),
        })
    }

    #[test]
    fn test_registry_creation() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.list_tools().is_empty());
    }

    #[test]
    fn test_registry_register_and_lookup() {
        let registry = ToolRegistry::new().with_tool(echo("b")).with_tool(echo("a"));

        assert!(registry.contains("a"));
        assert!(!registry.contains("unknown"));
        assert_eq!(registry.list_tools(), vec!["a", "b"]);
        assert_eq!(registry.get("b").map(|t| t.name()), Some("b"));
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = ToolRegistry::new();
        assert!(registry.register(echo("a")).is_none());
        assert!(registry.register(echo("a")).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_definitions_sorted() {
        let registry = ToolRegistry::new().with_tool(echo("z")).with_tool(echo("m"));
        let defs = registry.definitions();

        assert_eq!(defs[0], ToolDefinition::new("m", "Echoes its input"));
        assert_eq!(defs[1].name, "z");
    }

    #[tokio::test]
    async fn test_registered_tool_invokes() {
        let registry = ToolRegistry::new().with_tool(echo("echo"));
        let ctx = RunContext::new();

        let output = registry.get("echo").unwrap().invoke(&ctx, "hi").await.unwrap();
        assert_eq!(output.message, "hi");
    }
}
