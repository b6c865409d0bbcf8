//! Simulated email notification.

use super::{ids, input::split_fields, simulate_work};
use crate::config::ToolsConfig;
use crate::context::RunContext;
use crate::errors::ToolError;
use crate::tools::{Tool, ToolOutput};
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

const NOMINAL_LATENCY: Duration = Duration::from_secs(1);
const INPUT_FORMAT: &str = "recipient;subject;body";

/// Sends an email.
#[derive(Debug, Clone)]
pub struct EmailSender {
    latency: Duration,
}

impl EmailSender {
    /// Creates the tool from configuration.
    #[must_use]
    pub fn new(config: &ToolsConfig) -> Self {
        Self {
            latency: config.latency(NOMINAL_LATENCY),
        }
    }
}

#[async_trait]
impl Tool for EmailSender {
    fn name(&self) -> &str {
        ids::NOTIFIER
    }

    fn description(&self) -> &str {
        "Sends an email. Input: 'recipient;subject;body'."
    }

    async fn invoke(&self, ctx: &RunContext, input: &str) -> Result<ToolOutput, ToolError> {
        let [recipient, subject, body] = split_fields::<3>(self.name(), input, INPUT_FORMAT)?;
        let recipient = recipient.trim();
        if !recipient.contains('@') {
            return Err(ToolError::invalid_input(
                self.name(),
                format!("recipient '{recipient}' is not an email address"),
            ));
        }

        info!(tool = self.name(), %recipient, %subject, "Sending email");
        tracing::debug!(tool = self.name(), %body, "Email body");
        simulate_work(ctx, self.name(), self.latency).await?;

        Ok(ToolOutput::ok(format!("Email sent to {recipient}: {subject}")))
    }
}
