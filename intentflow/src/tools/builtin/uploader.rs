//! Simulated object storage upload.

use super::{ids, input::require_non_empty, simulate_work};
use crate::config::ToolsConfig;
use crate::context::{RunContext, UPLOADED_URL};
use crate::errors::ToolError;
use crate::tools::{Tool, ToolOutput};
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

const NOMINAL_LATENCY: Duration = Duration::from_secs(2);

/// Uploads a file to a COS bucket and reports its public URL.
#[derive(Debug, Clone)]
pub struct CosUploader {
    latency: Duration,
    base_url: String,
}

impl CosUploader {
    /// Creates the tool from configuration.
    #[must_use]
    pub fn new(config: &ToolsConfig) -> Self {
        Self {
            latency: config.latency(NOMINAL_LATENCY),
            base_url: config.upload_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn object_url(&self, file: &str) -> String {
        let key = file
            .strip_prefix("https://")
            .or_else(|| file.strip_prefix("http://"))
            .unwrap_or(file)
            .trim_start_matches('/');
        format!("{}/{key}", self.base_url)
    }
}

#[async_trait]
impl Tool for CosUploader {
    fn name(&self) -> &str {
        ids::UPLOADER
    }

    fn description(&self) -> &str {
        "Uploads a file to cloud object storage (Tencent COS). Input: a local file path."
    }

    async fn invoke(&self, ctx: &RunContext, input: &str) -> Result<ToolOutput, ToolError> {
        let file = require_non_empty(self.name(), input)?;

        info!(tool = self.name(), file = %file, "Uploading to COS");
        simulate_work(ctx, self.name(), self.latency).await?;

        let url = self.object_url(file);
        Ok(ToolOutput::ok(format!("Uploaded '{file}', available at {url}"))
            .with_artifact(UPLOADED_URL, url))
    }
}
