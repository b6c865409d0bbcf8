//! Simulated video download.

use super::{ids, input::require_non_empty, simulate_work};
use crate::config::ToolsConfig;
use crate::context::{RunContext, DEFAULT_MEDIA_PATH, PRIMARY_MEDIA_PATH};
use crate::errors::ToolError;
use crate::tools::{Tool, ToolOutput};
use async_trait::async_trait;
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::info;

const NOMINAL_LATENCY: Duration = Duration::from_secs(2);

/// Downloads a video from a URL and publishes its local path.
#[derive(Debug, Clone)]
pub struct VideoDownloader {
    latency: Duration,
}

impl VideoDownloader {
    /// Creates the tool from configuration.
    #[must_use]
    pub fn new(config: &ToolsConfig) -> Self {
        Self {
            latency: config.latency(NOMINAL_LATENCY),
        }
    }
}

fn file_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_-][A-Za-z0-9._-]*\.[A-Za-z0-9]+$").expect("file name pattern is valid")
    })
}

/// Picks the local file name for a download: the URL's last path segment
/// when it looks like a file name, the conventional default otherwise.
pub(crate) fn local_file_name(url: &str) -> String {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let without_query = without_scheme
        .split(&['?', '#'][..])
        .next()
        .unwrap_or(without_scheme);

    without_query
        .split_once('/')
        .and_then(|(_, path)| path.rsplit('/').next())
        .filter(|segment| file_name_pattern().is_match(segment))
        .map_or_else(|| DEFAULT_MEDIA_PATH.to_string(), ToString::to_string)
}

#[async_trait]
impl Tool for VideoDownloader {
    fn name(&self) -> &str {
        ids::DOWNLOADER
    }

    fn description(&self) -> &str {
        "Downloads a video file from the given URL. Input: the video URL."
    }

    async fn invoke(&self, ctx: &RunContext, input: &str) -> Result<ToolOutput, ToolError> {
        let url = require_non_empty(self.name(), input)?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ToolError::invalid_input(
                self.name(),
                format!("expected an http(s) URL, got '{url}'"),
            ));
        }

        info!(tool = self.name(), url = %url, "Downloading video");
        simulate_work(ctx, self.name(), self.latency).await?;

        let path = local_file_name(url);
        Ok(
            ToolOutput::ok(format!("Downloaded '{url}' to {path}"))
                .with_artifact(PRIMARY_MEDIA_PATH, path),
        )
    }
}
