//! Batch scenarios: named requests run one after another.

use crate::errors::{IntentflowError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A named request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Short label shown before the run.
    pub name: String,
    /// Free-text request.
    pub request: String,
}

impl Scenario {
    /// Creates a scenario.
    #[must_use]
    pub fn new(name: impl Into<String>, request: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            request: request.into(),
        }
    }
}

/// The demonstration set. The last one is deliberately unplannable.
#[must_use]
pub fn builtin_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            "Full video processing pipeline",
            "请帮我下载视频 https://example.com/tutorial.mp4，翻译字幕，上传到COS存储，生成处理报告，并发送到 admin@company.com",
        ),
        Scenario::new(
            "Download and email",
            "请帮我下载视频 https://example.com/tutorial.mp4,并发送到 admin@company.com",
        ),
        Scenario::new(
            "Simple download with notification",
            "下载这个视频 https://videos.site.com/meeting.mp4 完成后通知 user@example.com",
        ),
        Scenario::new(
            "Subtitle translation",
            "我需要翻译 https://content.edu.com/lecture.mp4 的字幕，完成后发邮件给 translator@team.com",
        ),
        Scenario::new(
            "Cloud backup with clip",
            "下载 https://backup.com/archive.mp4,剪辑视频, 并上传到COS，然后生成报告发给 storage@admin.com",
        ),
        Scenario::new("Unrecognised request", "帮我处理一下视频"),
    ]
}

/// Parses a JSON array of `{"name", "request"}` objects.
pub fn from_json(raw: &str) -> Result<Vec<Scenario>> {
    serde_json::from_str(raw).map_err(|e| IntentflowError::config(format!("scenarios: {e}")))
}

/// Reads scenarios from a JSON file.
pub fn load(path: &Path) -> Result<Vec<Scenario>> {
    let raw = std::fs::read_to_string(path)?;
    from_json(&raw).map_err(|e| IntentflowError::config(format!("{}: {e}", path.display())))
}
