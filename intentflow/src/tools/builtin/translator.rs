//! Simulated subtitle translation.

use super::{ids, input::require_non_empty, input::split_extension, simulate_work};
use crate::config::ToolsConfig;
use crate::context::{RunContext, SUBTITLE_PATH};
use crate::errors::ToolError;
use crate::tools::{Tool, ToolOutput};
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

const NOMINAL_LATENCY: Duration = Duration::from_secs(3);

/// Produces Chinese/English bilingual subtitles for a video.
#[derive(Debug, Clone)]
pub struct VideoTranslator {
    latency: Duration,
}

impl VideoTranslator {
    /// Creates the tool from configuration.
    #[must_use]
    pub fn new(config: &ToolsConfig) -> Self {
        Self {
            latency: config.latency(NOMINAL_LATENCY),
        }
    }
}

#[async_trait]
impl Tool for VideoTranslator {
    fn name(&self) -> &str {
        ids::TRANSLATOR
    }

    fn description(&self) -> &str {
        "Translates video subtitles into Chinese/English bilingual subtitles. Input: a video file name or URL."
    }

    async fn invoke(&self, ctx: &RunContext, input: &str) -> Result<ToolOutput, ToolError> {
        let file = require_non_empty(self.name(), input)?;

        info!(tool = self.name(), file = %file, "Translating subtitles");
        simulate_work(ctx, self.name(), self.latency).await?;

        let (stem, _) = split_extension(file);
        let subtitles = format!("{stem}.bilingual.srt");
        Ok(ToolOutput::ok(format!(
            "Translated subtitles for '{file}', bilingual track saved as {subtitles}"
        ))
        .with_artifact(SUBTITLE_PATH, subtitles))
    }
}
