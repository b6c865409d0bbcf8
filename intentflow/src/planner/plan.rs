//! Plan and step types.

use serde::Serialize;
use std::fmt;

/// One tool invocation in a plan.
///
/// Inputs are literal unless the step was built with
/// [`WorkflowStep::templated`]. Only templated inputs have their `${name}`
/// references substituted, so text lifted from a request reaches the tool
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowStep {
    tool: String,
    input: String,
    description: String,
    templated: bool,
}

impl WorkflowStep {
    /// Creates a step whose input is passed to the tool verbatim.
    #[must_use]
    pub fn new(
        tool: impl Into<String>,
        input: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            tool: tool.into(),
            input: input.into(),
            description: description.into(),
            templated: false,
        }
    }

    /// Creates a step whose input references artifacts as `${name}`.
    #[must_use]
    pub fn templated(
        tool: impl Into<String>,
        input: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            templated: true,
            ..Self::new(tool, input, description)
        }
    }

    /// Registry identifier of the tool to invoke.
    #[must_use]
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Argument string. See [`WorkflowStep::is_templated`].
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Whether `${artifact}` references in the input are substituted.
    #[must_use]
    pub fn is_templated(&self) -> bool {
        self.templated
    }

    /// Human-readable summary.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Ordered steps derived from one request. Order is execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Plan {
    steps: Vec<WorkflowStep>,
}

impl Plan {
    /// Creates a plan from steps in execution order.
    #[must_use]
    pub fn new(steps: Vec<WorkflowStep>) -> Self {
        Self { steps }
    }

    /// Returns the steps.
    #[must_use]
    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if there is nothing to run.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterates steps in execution order.
    pub fn iter(&self) -> std::slice::Iter<'_, WorkflowStep> {
        self.steps.iter()
    }

    /// Tool identifiers in execution order.
    #[must_use]
    pub fn tool_ids(&self) -> Vec<&str> {
        self.steps.iter().map(WorkflowStep::tool).collect()
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a WorkflowStep;
    type IntoIter = std::slice::Iter<'a, WorkflowStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// Renders the numbered step descriptions, one per line.
impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {}. {}", i + 1, step.description)?;
        }
        Ok(())
    }
}
