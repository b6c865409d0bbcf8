//! Built-in video tools.
//!
//! None of these touch the network or the filesystem; each waits for its
//! configured latency and describes what it would have done.

mod downloader;
mod editor;
mod input;
mod notifier;
mod report;
mod translator;
mod uploader;

pub use downloader::VideoDownloader;
pub use editor::VideoEditor;
pub use notifier::EmailSender;
pub use report::ReportGenerator;
pub use translator::VideoTranslator;
pub use uploader::CosUploader;

use super::ToolRegistry;
use crate::config::ToolsConfig;
use crate::context::RunContext;
use crate::errors::ToolError;
use std::sync::Arc;
use std::time::Duration;

/// Identifiers of the built-in tools. The planner emits exactly these.
pub mod ids {
    /// Downloads the subject video.
    pub const DOWNLOADER: &str = "VideoDownloader";
    /// Cuts a clip out of a video.
    pub const EDITOR: &str = "VideoEditor";
    /// Produces bilingual subtitles.
    pub const TRANSLATOR: &str = "VideoTranslator";
    /// Uploads a file to object storage.
    pub const UPLOADER: &str = "CosUploader";
    /// Writes a processing report.
    pub const REPORTER: &str = "ReportGenerator";
    /// Sends an email notification.
    pub const NOTIFIER: &str = "EmailSender";
}

/// Builds a registry holding every built-in tool.
#[must_use]
pub fn builtin_registry(config: &ToolsConfig) -> ToolRegistry {
    ToolRegistry::new()
        .with_tool(Arc::new(VideoDownloader::new(config)))
        .with_tool(Arc::new(VideoEditor::new(config)))
        .with_tool(Arc::new(VideoTranslator::new(config)))
        .with_tool(Arc::new(CosUploader::new(config)))
        .with_tool(Arc::new(ReportGenerator::new(config)))
        .with_tool(Arc::new(EmailSender::new(config)))
}

impl ToolRegistry {
    /// Builds a registry holding every built-in tool.
    #[must_use]
    pub fn builtin(config: &ToolsConfig) -> Self {
        builtin_registry(config)
    }
}

/// Waits out a tool's simulated latency, honouring cancellation.
pub(crate) async fn simulate_work(
    ctx: &RunContext,
    tool: &str,
    latency: Duration,
) -> Result<(), ToolError> {
    if latency.is_zero() {
        return match ctx.cancel_reason() {
            Some(reason) => Err(ToolError::cancelled(tool, reason)),
            None => Ok(()),
        };
    }
    ctx.pause(latency)
        .await
        .map_err(|reason| ToolError::cancelled(tool, reason))
}
