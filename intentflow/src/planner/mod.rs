//! Rule-based planning from request text to an ordered [`Plan`].
//!
//! Steps are emitted in a fixed category order (download, edit, translate,
//! upload, report, notify) filtered to the triggers the request fired. The
//! order never depends on where keywords appear in the text.

mod plan;

pub use plan::{Plan, WorkflowStep};

use crate::context::{artifact_ref, PRIMARY_MEDIA_PATH};
use crate::intent::{classify, extract, ExtractedEntities, IntentFlags};
use crate::tools::ids;
use tracing::debug;

/// Range cut when the request asks for an edit. Requests carry no timestamps.
pub const DEFAULT_CLIP_START: &str = "00:00:00";
/// See [`DEFAULT_CLIP_START`].
pub const DEFAULT_CLIP_END: &str = "00:01:00";

const DOWNLOAD_SUBJECT: &str = "Video download complete";
const DOWNLOAD_BODY: &str = "The video download task has finished.";
const PROCESSING_SUBJECT: &str = "Video processing complete";
const PROCESSING_BODY: &str =
    "Your video processing task has finished. See the attached report for details.";

/// What the planner read out of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// URLs and email addresses.
    pub entities: ExtractedEntities,
    /// Fired triggers.
    pub flags: IntentFlags,
}

impl Analysis {
    /// Analyses raw request text.
    #[must_use]
    pub fn of(text: &str) -> Self {
        Self {
            entities: extract(text),
            flags: classify(text),
        }
    }
}

/// Builds plans. Stateless; one instance can serve any number of requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Planner;

impl Planner {
    /// Creates a planner.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Derives the plan for a request. An empty plan means nothing actionable.
    #[must_use]
    pub fn plan(&self, text: &str) -> Plan {
        let analysis = Analysis::of(text);
        debug!(
            urls = analysis.entities.urls.len(),
            emails = analysis.entities.emails.len(),
            flags = ?analysis.flags,
            "Analysed request"
        );
        self.plan_from(&analysis)
    }

    /// Derives the plan from an existing analysis.
    #[must_use]
    pub fn plan_from(&self, analysis: &Analysis) -> Plan {
        let Some(url) = analysis.entities.primary_url() else {
            return Plan::default();
        };
        let flags = &analysis.flags;
        let media = artifact_ref(PRIMARY_MEDIA_PATH);
        let mut steps = Vec::new();

        if flags.needs_download() {
            steps.push(WorkflowStep::new(
                ids::DOWNLOADER,
                url,
                format!("Download video: {url}"),
            ));
        }

        if flags.wants_edit {
            steps.push(WorkflowStep::templated(
                ids::EDITOR,
                format!("{media};{DEFAULT_CLIP_START};{DEFAULT_CLIP_END}"),
                "Cut a clip from the video",
            ));
        }

        if flags.wants_translate {
            steps.push(WorkflowStep::templated(
                ids::TRANSLATOR,
                media.as_str(),
                "Translate video subtitles",
            ));
        }

        if flags.wants_upload {
            steps.push(WorkflowStep::templated(
                ids::UPLOADER,
                media.as_str(),
                "Upload video to Tencent COS",
            ));
        }

        if flags.wants_report {
            steps.push(WorkflowStep::templated(
                ids::REPORTER,
                media.as_str(),
                "Generate video processing report",
            ));
        }

        if let (true, Some(email)) = (flags.wants_notify, analysis.entities.primary_email()) {
            let (subject, body) = if flags.is_bare_download() {
                (DOWNLOAD_SUBJECT, DOWNLOAD_BODY)
            } else {
                (PROCESSING_SUBJECT, PROCESSING_BODY)
            };
            steps.push(WorkflowStep::new(
                ids::NOTIFIER,
                format!("{email};{subject};{body}"),
                format!("Send email notification to: {email}"),
            ));
        }

        Plan::new(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tools(text: &str) -> Vec<String> {
        Planner::new()
            .plan(text)
            .tool_ids()
            .into_iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_no_url_gives_empty_plan() {
        assert!(Planner::new().plan("帮我处理一下视频").is_empty());
        assert!(Planner::new().plan("下载并翻译，发送到 a@b.com").is_empty());
    }

    #[test]
    fn test_url_without_triggers_gives_empty_plan() {
        assert!(Planner::new().plan("看看 https://a.com/v.mp4").is_empty());
    }

    #[test]
    fn test_download_only() {
        let plan = Planner::new().plan("下载视频 https://a.com/v.mp4");
        assert_eq!(
            plan,
            Plan::new(vec![WorkflowStep::new(
                ids::DOWNLOADER,
                "https://a.com/v.mp4",
                "Download video: https://a.com/v.mp4"
            )])
        );
    }

    #[test]
    fn test_translate_with_email() {
        assert_eq!(
            tools("我需要翻译 https://content.edu.com/lecture.mp4 的字幕，完成后发邮件给 translator@team.com"),
            vec![ids::DOWNLOADER, ids::TRANSLATOR, ids::NOTIFIER]
        );
    }

    #[test]
    fn test_notify_without_email_is_dropped() {
        assert_eq!(tools("下载 https://x.com/v.mp4 并通知我"), vec![ids::DOWNLOADER]);
    }

    #[test]
    fn test_order_ignores_keyword_order() {
        assert_eq!(
            tools("上传后下载 https://x.com/v.mp4"),
            vec![ids::DOWNLOADER, ids::UPLOADER]
        );
    }

    #[test]
    fn test_full_pipeline_order() {
        assert_eq!(
            tools("report, email a@b.com, upload, translate, edit https://x.com/v.mp4"),
            vec![
                ids::DOWNLOADER,
                ids::EDITOR,
                ids::TRANSLATOR,
                ids::UPLOADER,
                ids::REPORTER,
                ids::NOTIFIER
            ]
        );
    }

    #[test]
    fn test_edit_alone_skips_download() {
        let plan = Planner::new().plan("剪辑 https://x.com/v.mp4");
        assert_eq!(plan.tool_ids(), vec![ids::EDITOR]);
        assert_eq!(plan.steps()[0].input(), "${primary_media_path};00:00:00;00:01:00");
    }

    #[test]
    fn test_downstream_steps_reference_media_artifact() {
        let plan = Planner::new().plan("translate https://x.com/v.mp4 and upload");
        assert_eq!(plan.steps()[1].input(), "${primary_media_path}");
        assert_eq!(plan.steps()[2].input(), "${primary_media_path}");
        assert!(plan.steps()[1].is_templated());
        assert!(!plan.steps()[0].is_templated());
    }

    #[test]
    fn test_request_text_is_never_templated() {
        let plan = Planner::new().plan("下载视频 https://cdn.example.com/v/${id}.mp4 并通知 ops@example.com");

        assert_eq!(plan.tool_ids(), vec![ids::DOWNLOADER, ids::NOTIFIER]);
        assert_eq!(plan.steps()[0].input(), "https://cdn.example.com/v/${id}.mp4");
        assert!(plan.steps().iter().all(|step| !step.is_templated()));
    }

    #[test]
    fn test_bare_download_notification_template() {
        let plan = Planner::new().plan("下载这个视频 https://v.com/m.mp4 完成后通知 user@example.com");
        let notify = plan.steps().last().unwrap();

        assert_eq!(notify.tool(), ids::NOTIFIER);
        assert_eq!(
            notify.input(),
            format!("user@example.com;{DOWNLOAD_SUBJECT};{DOWNLOAD_BODY}")
        );
    }

    #[test]
    fn test_processing_notification_template() {
        let plan = Planner::new().plan("翻译 https://v.com/m.mp4 并发送到 a@b.com");
        let notify = plan.steps().last().unwrap();
        assert!(notify.input().starts_with(&format!("a@b.com;{PROCESSING_SUBJECT};")));
    }

    #[test]
    fn test_first_url_and_email_win() {
        let plan = Planner::new().plan("download https://a.com/1.mp4 https://b.com/2.mp4 email x@a.io y@b.io");
        assert_eq!(plan.steps()[0].input(), "https://a.com/1.mp4");
        assert!(plan.steps()[1].input().starts_with("x@a.io;"));
    }

    #[test]
    fn test_planning_is_deterministic() {
        let text = "请帮我下载视频 https://example.com/tutorial.mp4，翻译字幕，上传到COS存储，生成处理报告，并发送到 admin@company.com";
        assert_eq!(Planner::new().plan(text), Planner::new().plan(text));
    }
}
