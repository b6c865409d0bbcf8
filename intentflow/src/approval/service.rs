//! Out-of-band plan approval.

use super::Confirmer;
use crate::planner::Plan;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{info, warn};
use uuid::Uuid;

/// Default time a plan waits for a decision.
pub const DEFAULT_APPROVAL_TIMEOUT: Duration = Duration::from_secs(300);

/// Why an approval request ended without a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalStatus {
    /// No decision arrived in time.
    TimedOut,
    /// The request was withdrawn.
    Cancelled,
}

#[derive(Debug)]
struct PendingApproval {
    summary: String,
    created_at: Instant,
    response_tx: oneshot::Sender<bool>,
}

/// Holds plans awaiting a decision from some other party.
///
/// [`Confirmer::confirm`] registers the plan and waits; [`approve`](Self::approve)
/// or [`deny`](Self::deny) resolves it by id. Timeouts count as a decline.
pub struct ApprovalService {
    requests: RwLock<HashMap<Uuid, PendingApproval>>,
    timeout: Duration,
}

impl Default for ApprovalService {
    fn default() -> Self {
        Self::new()
    }
}

impl ApprovalService {
    /// Creates a service with the default timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            requests: RwLock::new(HashMap::new()),
            timeout: DEFAULT_APPROVAL_TIMEOUT,
        }
    }

    /// Sets the time a request waits before it is declined.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Registers a plan and waits for a decision.
    pub async fn request_approval(&self, plan: &Plan) -> Result<bool, ApprovalStatus> {
        let request_id = Uuid::new_v4();
        let (tx, rx) = oneshot::channel();

        self.requests.write().insert(
            request_id,
            PendingApproval {
                summary: plan.to_string(),
                created_at: Instant::now(),
                response_tx: tx,
            },
        );
        info!(%request_id, steps = plan.len(), "Awaiting plan approval");

        let result = match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(approved)) => Ok(approved),
            Ok(Err(_)) => Err(ApprovalStatus::Cancelled),
            Err(_) => Err(ApprovalStatus::TimedOut),
        };
        self.requests.write().remove(&request_id);
        result
    }

    /// Approves a pending request. Returns false if it is unknown.
    pub fn approve(&self, request_id: Uuid) -> bool {
        self.decide(request_id, true)
    }

    /// Denies a pending request. Returns false if it is unknown.
    pub fn deny(&self, request_id: Uuid) -> bool {
        self.decide(request_id, false)
    }

    /// Withdraws a pending request; its waiter sees [`ApprovalStatus::Cancelled`].
    pub fn cancel(&self, request_id: Uuid) -> bool {
        self.requests.write().remove(&request_id).is_some()
    }

    fn decide(&self, request_id: Uuid, approved: bool) -> bool {
        self.requests
            .write()
            .remove(&request_id)
            .is_some_and(|request| request.response_tx.send(approved).is_ok())
    }

    /// Returns the number of pending requests.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.requests.read().len()
    }

    /// Lists pending requests, oldest first, with their plan summaries.
    #[must_use]
    pub fn pending_requests(&self) -> Vec<(Uuid, String)> {
        let requests = self.requests.read();
        let mut pending: Vec<_> = requests
            .iter()
            .map(|(id, req)| (req.created_at, *id, req.summary.clone()))
            .collect();
        pending.sort_by_key(|(created_at, _, _)| *created_at);
        pending
            .into_iter()
            .map(|(_, id, summary)| (id, summary))
            .collect()
    }
}

#[async_trait]
impl Confirmer for ApprovalService {
    async fn confirm(&self, plan: &Plan) -> bool {
        match self.request_approval(plan).await {
            Ok(approved) => approved,
            Err(status) => {
                warn!(?status, "Plan approval ended without a decision");
                false
            }
        }
    }
}

impl std::fmt::Debug for ApprovalService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApprovalService")
            .field("pending_count", &self.pending_count())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::WorkflowStep;
    use std::sync::Arc;

    fn plan() -> Plan {
        Plan::new(vec![WorkflowStep::new("A", "x", "Do the thing")])
    }

    async fn wait_for_pending(service: &ApprovalService) -> Uuid {
        loop {
            if let Some((id, _)) = service.pending_requests().into_iter().next() {
                return id;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    #[tokio::test]
    async fn test_approval_approved() {
        let service = Arc::new(ApprovalService::new());
        let waiter = service.clone();
        let handle = tokio::spawn(async move { waiter.confirm(&plan()).await });

        let id = wait_for_pending(&service).await;
        assert_eq!(service.pending_requests()[0].1, "  1. Do the thing");
        assert!(service.approve(id));

        assert!(handle.await.unwrap());
        assert_eq!(service.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_approval_denied() {
        let service = Arc::new(ApprovalService::new());
        let waiter = service.clone();
        let handle = tokio::spawn(async move { waiter.request_approval(&plan()).await });

        let id = wait_for_pending(&service).await;
        assert!(service.deny(id));
        assert_eq!(handle.await.unwrap(), Ok(false));
    }

    #[tokio::test]
    async fn test_approval_timeout_declines() {
        let service = ApprovalService::new().with_timeout(Duration::from_millis(20));

        assert_eq!(
            service.request_approval(&plan()).await,
            Err(ApprovalStatus::TimedOut)
        );
        assert!(!service.confirm(&plan()).await);
        assert_eq!(service.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_request() {
        let service = Arc::new(ApprovalService::new());
        let waiter = service.clone();
        let handle = tokio::spawn(async move { waiter.request_approval(&plan()).await });

        let id = wait_for_pending(&service).await;
        assert!(service.cancel(id));
        assert_eq!(handle.await.unwrap(), Err(ApprovalStatus::Cancelled));
    }

    #[test]
    fn test_unknown_request() {
        let service = ApprovalService::new();
        assert!(!service.approve(Uuid::new_v4()));
        assert!(!service.deny(Uuid::new_v4()));
    }
}
