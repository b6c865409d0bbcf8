//! The mutable context for a single request.

use super::ArtifactBag;
use crate::cancellation::CancellationToken;
use crate::events::{EventSink, NoOpEventSink};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

/// Reason reported when a run outlives its deadline.
pub const DEADLINE_EXCEEDED: &str = "deadline exceeded";

/// Execution context for one request.
///
/// Each request gets its own context; nothing in it is shared with other
/// requests except the cancellation token when the caller chooses to share it.
pub struct RunContext {
    /// Run identifier, used to correlate logs and events.
    run_id: Uuid,
    /// Cooperative cancellation.
    token: Arc<CancellationToken>,
    /// Time budget that starts when execution begins.
    timeout: Option<Duration>,
    /// Point in time after which the run counts as cancelled. Set once.
    deadline: OnceLock<Instant>,
    /// Artifacts published by completed steps.
    artifacts: ArtifactBag,
    /// Event sink for progress reporting.
    event_sink: Arc<dyn EventSink>,
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RunContext {
    /// Creates a new context with no deadline and a fresh token.
    #[must_use]
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            token: Arc::new(CancellationToken::new()),
            timeout: None,
            deadline: OnceLock::new(),
            artifacts: ArtifactBag::with_defaults(),
            event_sink: Arc::new(NoOpEventSink),
        }
    }

    /// Uses an externally owned cancellation token.
    #[must_use]
    pub fn with_token(mut self, token: Arc<CancellationToken>) -> Self {
        self.token = token;
        self
    }

    /// Sets a time budget. The clock starts at [`RunContext::start_deadline`],
    /// so time spent waiting for approval does not count.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets an absolute deadline, effective immediately.
    #[must_use]
    pub fn with_deadline(self, deadline: Instant) -> Self {
        let _ = self.deadline.set(deadline);
        self
    }

    /// Starts the timeout clock if a budget is set and no deadline is fixed yet.
    /// Later calls keep the first deadline.
    pub fn start_deadline(&self) -> Option<Instant> {
        if let Some(timeout) = self.timeout {
            return Some(*self.deadline.get_or_init(|| Instant::now() + timeout));
        }
        self.deadline()
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    /// Returns the run ID.
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Returns the cancellation token.
    #[must_use]
    pub fn token(&self) -> &Arc<CancellationToken> {
        &self.token
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline.get().copied()
    }

    /// Returns the artifact bag.
    #[must_use]
    pub fn artifacts(&self) -> &ArtifactBag {
        &self.artifacts
    }

    /// Returns true once the token is cancelled or the deadline has passed.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_reason().is_some()
    }

    /// Returns why the run counts as cancelled, if it does.
    #[must_use]
    pub fn cancel_reason(&self) -> Option<String> {
        if self.token.is_cancelled() {
            return Some(self.token.reason().unwrap_or_else(|| "cancelled".to_string()));
        }
        match self.deadline() {
            Some(deadline) if Instant::now() >= deadline => Some(DEADLINE_EXCEEDED.to_string()),
            _ => None,
        }
    }

    /// Waits for `duration`, returning early if the run is cancelled.
    ///
    /// # Errors
    ///
    /// Returns the cancellation reason if the token fires or the deadline
    /// passes before the wait completes.
    pub async fn pause(&self, duration: Duration) -> Result<(), String> {
        if let Some(reason) = self.cancel_reason() {
            return Err(reason);
        }

        let deadline = async {
            match self.deadline() {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.token.cancelled() => {
                Err(self.token.reason().unwrap_or_else(|| "cancelled".to_string()))
            }
            () = deadline => Err(DEADLINE_EXCEEDED.to_string()),
            () = tokio::time::sleep(duration) => Ok(()),
        }
    }

    /// Emits an event to the configured sink, tagged with the run ID.
    pub fn try_emit_event(&self, event_type: &str, data: Option<serde_json::Value>) {
        let data = match data {
            Some(serde_json::Value::Object(mut map)) => {
                map.insert("run_id".to_string(), serde_json::json!(self.run_id.to_string()));
                Some(serde_json::Value::Object(map))
            }
            None => Some(serde_json::json!({ "run_id": self.run_id.to_string() })),
            other => other,
        };
        self.event_sink.try_emit(event_type, data);
    }
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("run_id", &self.run_id)
            .field("cancelled", &self.token.is_cancelled())
            .field("deadline", &self.deadline())
            .field("artifacts", &self.artifacts.len())
            .finish()
    }
}
