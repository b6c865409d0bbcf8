//! Simulated processing report.

use super::{ids, input::require_non_empty, simulate_work};
use crate::config::ToolsConfig;
use crate::context::RunContext;
use crate::errors::ToolError;
use crate::tools::{Tool, ToolOutput};
use async_trait::async_trait;
use chrono::Local;
use std::time::Duration;
use tracing::info;

const NOMINAL_LATENCY: Duration = Duration::from_secs(1);

/// Writes a short processing report for a video.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    latency: Duration,
}

impl ReportGenerator {
    /// Creates the tool from configuration.
    #[must_use]
    pub fn new(config: &ToolsConfig) -> Self {
        Self {
            latency: config.latency(NOMINAL_LATENCY),
        }
    }
}

fn render_report(file: &str, generated_at: &str) -> String {
    [
        "===== Video Processing Report =====".to_string(),
        format!("Generated:  {generated_at}"),
        format!("Video file: {file}"),
        "Status:     completed".to_string(),
        "===================================".to_string(),
    ]
    .join("\n")
}

#[async_trait]
impl Tool for ReportGenerator {
    fn name(&self) -> &str {
        ids::REPORTER
    }

    fn description(&self) -> &str {
        "Generates a video processing report. Input: a video file name or URL."
    }

    async fn invoke(&self, ctx: &RunContext, input: &str) -> Result<ToolOutput, ToolError> {
        let file = require_non_empty(self.name(), input)?;

        info!(tool = self.name(), file = %file, "Generating report");
        simulate_work(ctx, self.name(), self.latency).await?;

        let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        Ok(ToolOutput::ok(render_report(file, &generated_at)))
    }
}
