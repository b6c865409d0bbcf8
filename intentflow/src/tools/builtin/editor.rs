//! Simulated clip extraction.

use super::{ids, input::split_extension, input::split_fields, simulate_work};
use crate::config::ToolsConfig;
use crate::context::{RunContext, CLIP_PATH};
use crate::errors::ToolError;
use crate::tools::{Tool, ToolOutput};
use async_trait::async_trait;
use chrono::NaiveTime;
use std::time::Duration;
use tracing::info;

const NOMINAL_LATENCY: Duration = Duration::from_secs(2);
const INPUT_FORMAT: &str = "video_file;start_time;end_time";

/// Cuts the `start..end` range out of a video.
#[derive(Debug, Clone)]
pub struct VideoEditor {
    latency: Duration,
}

impl VideoEditor {
    /// Creates the tool from configuration.
    #[must_use]
    pub fn new(config: &ToolsConfig) -> Self {
        Self {
            latency: config.latency(NOMINAL_LATENCY),
        }
    }

    fn parse_time(&self, field: &str, raw: &str) -> Result<NaiveTime, ToolError> {
        NaiveTime::parse_from_str(raw.trim(), "%H:%M:%S").map_err(|_| {
            ToolError::invalid_input(
                self.name(),
                format!("{field} '{raw}' is not a HH:MM:SS timestamp"),
            )
        })
    }
}

#[async_trait]
impl Tool for VideoEditor {
    fn name(&self) -> &str {
        ids::EDITOR
    }

    fn description(&self) -> &str {
        "Cuts a clip from a video. Input: 'video_file;start_time;end_time' with times as HH:MM:SS."
    }

    async fn invoke(&self, ctx: &RunContext, input: &str) -> Result<ToolOutput, ToolError> {
        let [file, start, end] = split_fields::<3>(self.name(), input, INPUT_FORMAT)?;
        let file = file.trim();
        if file.is_empty() {
            return Err(ToolError::invalid_input(self.name(), "video_file is empty"));
        }

        let start_time = self.parse_time("start_time", start)?;
        let end_time = self.parse_time("end_time", end)?;
        if start_time >= end_time {
            return Err(ToolError::invalid_input(
                self.name(),
                format!("start_time {start_time} must be before end_time {end_time}"),
            ));
        }

        info!(tool = self.name(), file = %file, %start_time, %end_time, "Editing video");
        simulate_work(ctx, self.name(), self.latency).await?;

        let clip = match split_extension(file) {
            (stem, Some(ext)) => format!("{stem}_clip.{ext}"),
            (stem, None) => format!("{stem}_clip"),
        };
        Ok(ToolOutput::ok(format!(
            "Cut '{file}' from {start_time} to {end_time}, saved as {clip}"
        ))
        .with_artifact(CLIP_PATH, clip))
    }
}
