//! Request processing: plan, optionally confirm, execute.

mod integration_tests;

use crate::approval::{AutoApprove, Confirmer};
use crate::config::EngineConfig;
use crate::context::RunContext;
use crate::errors::{IntentflowError, Result};
use crate::executor::WorkflowExecutor;
use crate::planner::{Plan, Planner};
use crate::tools::{ToolDefinition, ToolRegistry};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Whether a plan needs approval before it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmationPolicy {
    /// Ask the confirmer first.
    #[default]
    Required,
    /// Run straight away.
    Skip,
}

/// How a request ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Every step ran.
    Completed {
        /// Number of steps executed.
        steps: usize,
    },
    /// The confirmer said no. Nothing ran.
    Declined,
}

/// Ties the planner, confirmation gate and executor together.
pub struct IntentEngine {
    planner: Planner,
    executor: WorkflowExecutor,
    confirmer: Arc<dyn Confirmer>,
}

impl IntentEngine {
    /// Creates an engine around an executor. Plans are auto-approved until a
    /// confirmer is set.
    #[must_use]
    pub fn new(executor: WorkflowExecutor) -> Self {
        Self {
            planner: Planner::new(),
            executor,
            confirmer: Arc::new(AutoApprove),
        }
    }

    /// Creates an engine over the built-in tools.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        let registry = Arc::new(ToolRegistry::builtin(&config.tools));
        Self::new(WorkflowExecutor::new(registry).with_step_pause(config.step_pause()))
    }

    /// Sets the confirmer consulted under [`ConfirmationPolicy::Required`].
    #[must_use]
    pub fn with_confirmer(mut self, confirmer: Arc<dyn Confirmer>) -> Self {
        self.confirmer = confirmer;
        self
    }

    /// Derives the plan for a request without running it.
    #[must_use]
    pub fn plan(&self, request: &str) -> Plan {
        self.planner.plan(request)
    }

    /// Lists the registered tools, sorted by name.
    #[must_use]
    pub fn capabilities(&self) -> Vec<ToolDefinition> {
        self.executor.registry().definitions()
    }

    /// Processes one request.
    ///
    /// # Errors
    ///
    /// Returns [`IntentflowError::Unplannable`] before the confirmer is
    /// consulted if nothing actionable was found,
    /// [`IntentflowError::Cancelled`] if the token fires while the confirmer
    /// is still deciding, or any error from [`WorkflowExecutor::execute`].
    pub async fn process(
        &self,
        ctx: &RunContext,
        request: &str,
        policy: ConfirmationPolicy,
    ) -> Result<RequestOutcome> {
        info!(run_id = %ctx.run_id(), %request, "Received request");

        let plan = self.plan(request);
        if plan.is_empty() {
            info!(run_id = %ctx.run_id(), "No actionable steps in request");
            ctx.try_emit_event("workflow.unplannable", Some(json!({ "request": request })));
            return Err(IntentflowError::Unplannable);
        }

        ctx.try_emit_event(
            "workflow.planned",
            Some(json!({ "request": request, "plan": &plan })),
        );

        if policy == ConfirmationPolicy::Required && !self.confirm(ctx, &plan).await? {
            info!(run_id = %ctx.run_id(), "Plan declined");
            ctx.try_emit_event("workflow.declined", Some(json!({ "steps": plan.len() })));
            return Ok(RequestOutcome::Declined);
        }

        self.executor.execute(ctx, &plan).await?;
        Ok(RequestOutcome::Completed { steps: plan.len() })
    }

    /// Asks the confirmer, giving up as soon as the run's token is cancelled.
    /// The deadline is not consulted; it only starts once execution begins.
    async fn confirm(&self, ctx: &RunContext, plan: &Plan) -> Result<bool> {
        tokio::select! {
            biased;
            () = ctx.token().cancelled() => {
                let reason = ctx.token().reason().unwrap_or_else(|| "cancelled".to_string());
                warn!(run_id = %ctx.run_id(), %reason, "Cancelled while awaiting confirmation");
                ctx.try_emit_event(
                    "workflow.cancelled",
                    Some(json!({ "step": 1, "reason": &reason })),
                );
                Err(IntentflowError::cancelled(1, reason))
            }
            approved = self.confirmer.confirm(plan) => Ok(approved),
        }
    }

    /// Processes a request behind the confirmation gate.
    ///
    /// # Errors
    ///
    /// See [`process`](Self::process).
    pub async fn process_batch(&self, ctx: &RunContext, request: &str) -> Result<RequestOutcome> {
        self.process(ctx, request, ConfirmationPolicy::Required).await
    }

    /// Processes a request without asking for confirmation.
    ///
    /// # Errors
    ///
    /// See [`process`](Self::process).
    pub async fn process_interactive(
        &self,
        ctx: &RunContext,
        request: &str,
    ) -> Result<RequestOutcome> {
        self.process(ctx, request, ConfirmationPolicy::Skip).await
    }
}

impl std::fmt::Debug for IntentEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentEngine")
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}
