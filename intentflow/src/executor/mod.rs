//! Sequential plan execution.
//!
//! The executor walks a [`Plan`] in order and stops at the first failure.
//! There is no retry, no rollback and no parallelism. Progress is reported
//! only through the context's event sink and `tracing`.

use crate::context::RunContext;
use crate::errors::{IntentflowError, Result, ToolError};
use crate::planner::{Plan, WorkflowStep};
use crate::tools::{ToolOutput, ToolRegistry};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default pause between successful steps.
pub const DEFAULT_STEP_PAUSE: Duration = Duration::from_millis(500);

/// Runs plans against an injected tool registry.
#[derive(Debug, Clone)]
pub struct WorkflowExecutor {
    registry: Arc<ToolRegistry>,
    step_pause: Duration,
}

impl WorkflowExecutor {
    /// Creates an executor over a registry.
    #[must_use]
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            step_pause: DEFAULT_STEP_PAUSE,
        }
    }

    /// Sets the pause between successful steps.
    #[must_use]
    pub fn with_step_pause(mut self, pause: Duration) -> Self {
        self.step_pause = pause;
        self
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Executes every step of `plan` in order.
    ///
    /// Starts the context's timeout clock if it has not started yet.
    ///
    /// # Errors
    ///
    /// - [`IntentflowError::Unplannable`] if the plan is empty
    /// - [`IntentflowError::Cancelled`] if the context is cancelled or past its
    ///   deadline before a step starts, or a tool reports cancellation
    /// - [`IntentflowError::UnknownTool`] if a step names an unregistered tool
    /// - [`IntentflowError::MissingArtifact`] if a templated step references an
    ///   artifact nothing has published
    /// - [`IntentflowError::StepFailed`] if a tool returns an error
    pub async fn execute(&self, ctx: &RunContext, plan: &Plan) -> Result<()> {
        if plan.is_empty() {
            return Err(IntentflowError::Unplannable);
        }

        ctx.start_deadline();
        let total = plan.len();
        info!(run_id = %ctx.run_id(), steps = total, "Starting workflow");
        ctx.try_emit_event("workflow.started", Some(json!({ "steps": total })));

        for (index, step) in plan.iter().enumerate() {
            let number = index + 1;

            if let Err(err) = self.run_step(ctx, step, number, total).await {
                Self::report_failure(ctx, step, total, &err);
                return Err(err);
            }

            if number < total && !self.step_pause.is_zero() {
                if let Err(reason) = ctx.pause(self.step_pause).await {
                    let err = IntentflowError::cancelled(number + 1, reason);
                    Self::report_failure(ctx, &plan.steps()[number], total, &err);
                    return Err(err);
                }
            }
        }

        info!(run_id = %ctx.run_id(), steps = total, "Workflow completed");
        ctx.try_emit_event("workflow.completed", Some(json!({ "steps": total })));
        Ok(())
    }

    async fn run_step(
        &self,
        ctx: &RunContext,
        step: &WorkflowStep,
        number: usize,
        total: usize,
    ) -> Result<ToolOutput> {
        if let Some(reason) = ctx.cancel_reason() {
            return Err(IntentflowError::cancelled(number, reason));
        }

        info!(step = number, total, tool = step.tool(), "{}", step.description());
        ctx.try_emit_event(
            "step.started",
            Some(json!({
                "step": number,
                "total": total,
                "tool": step.tool(),
                "description": step.description(),
            })),
        );

        let tool = self
            .registry
            .get(step.tool())
            .ok_or_else(|| IntentflowError::UnknownTool {
                step: number,
                tool: step.tool().to_string(),
            })?;

        let input = if step.is_templated() {
            ctx.artifacts()
                .resolve(step.input())
                .map_err(|name| IntentflowError::MissingArtifact { step: number, name })?
        } else {
            step.input().to_string()
        };

        debug!(step = number, tool = step.tool(), input = %input, "Invoking tool");

        let output = tool
            .invoke(ctx, &input)
            .await
            .map_err(|source| match source {
                ToolError::Cancelled { reason, .. } => IntentflowError::cancelled(number, reason),
                other => IntentflowError::step_failed(number, total, step.tool(), other),
            })?;

        for (name, value) in &output.artifacts {
            ctx.artifacts().publish(name.clone(), value.clone());
        }

        ctx.try_emit_event(
            "step.completed",
            Some(json!({
                "step": number,
                "total": total,
                "tool": step.tool(),
                "message": output.message,
                "artifacts": output.artifacts,
            })),
        );
        Ok(output)
    }

    fn report_failure(
        ctx: &RunContext,
        step: &WorkflowStep,
        total: usize,
        err: &IntentflowError,
    ) {
        let number = err.step().unwrap_or_default();
        if let IntentflowError::Cancelled { reason, .. } = err {
            warn!(run_id = %ctx.run_id(), step = number, %reason, "Workflow cancelled");
            ctx.try_emit_event(
                "workflow.cancelled",
                Some(json!({ "step": number, "reason": reason })),
            );
        } else {
            warn!(run_id = %ctx.run_id(), step = number, tool = step.tool(), error = %err, "Step failed");
            ctx.try_emit_event(
                "step.failed",
                Some(json!({
                    "step": number,
                    "total": total,
                    "tool": step.tool(),
                    "error": err.to_dict(),
                })),
            );
        }
    }
}
