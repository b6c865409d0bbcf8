//! Confirmation gate between planning and execution.
//!
//! A [`Confirmer`] is shown the plan and answers yes or no. A "no" is a
//! normal outcome, never an error.

mod prompt;
mod service;

pub use prompt::{is_affirmative, PromptConfirmer};
pub use service::{ApprovalService, ApprovalStatus};

use crate::planner::Plan;
use async_trait::async_trait;

/// Decides whether a plan may run.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Confirmer: Send + Sync {
    /// Returns true if the plan is approved.
    async fn confirm(&self, plan: &Plan) -> bool;
}

/// Approves every plan.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

#[async_trait]
impl Confirmer for AutoApprove {
    async fn confirm(&self, _plan: &Plan) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_auto_approve() {
        assert!(AutoApprove.confirm(&Plan::default()).await);
    }

    #[tokio::test]
    async fn test_mock_confirmer() {
        let mut mock = MockConfirmer::new();
        mock.expect_confirm().times(1).returning(|plan| plan.is_empty());

        assert!(mock.confirm(&Plan::default()).await);
    }
}
