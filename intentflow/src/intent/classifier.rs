//! Keyword triggers.

use serde::Serialize;

/// The actions a request can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Fetch the video.
    Download,
    /// Produce bilingual subtitles.
    Translate,
    /// Store the result in object storage.
    Upload,
    /// Write a processing report.
    Report,
    /// Email someone when done.
    Notify,
    /// Cut a clip.
    Edit,
}

impl Trigger {
    /// All triggers.
    pub const ALL: [Self; 6] = [
        Self::Download,
        Self::Translate,
        Self::Upload,
        Self::Report,
        Self::Notify,
        Self::Edit,
    ];

    /// Lower-case keywords that fire this trigger.
    #[must_use]
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Download => &["下载", "download"],
            Self::Translate => &["翻译", "translate", "字幕"],
            Self::Upload => &["上传", "upload", "cos", "存储"],
            Self::Report => &["报告", "report", "总结"],
            Self::Notify => &["邮件", "email", "发送", "通知"],
            Self::Edit => &["视频剪辑", "edit", "剪辑"],
        }
    }

    fn matches(self, lowered: &str) -> bool {
        self.keywords().iter().any(|keyword| lowered.contains(keyword))
    }
}

/// Which triggers a request fired.
///
/// Matching is plain substring search on the lower-cased text, so negations
/// such as "不要下载" still fire [`Trigger::Download`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct IntentFlags {
    /// Download trigger.
    pub wants_download: bool,
    /// Translate trigger.
    pub wants_translate: bool,
    /// Upload trigger.
    pub wants_upload: bool,
    /// Report trigger.
    pub wants_report: bool,
    /// Notify trigger.
    pub wants_notify: bool,
    /// Edit trigger.
    pub wants_edit: bool,
}

impl IntentFlags {
    /// Returns whether a trigger fired.
    #[must_use]
    pub fn get(&self, trigger: Trigger) -> bool {
        match trigger {
            Trigger::Download => self.wants_download,
            Trigger::Translate => self.wants_translate,
            Trigger::Upload => self.wants_upload,
            Trigger::Report => self.wants_report,
            Trigger::Notify => self.wants_notify,
            Trigger::Edit => self.wants_edit,
        }
    }

    /// True when some requested action needs the video downloaded first.
    #[must_use]
    pub fn needs_download(&self) -> bool {
        self.wants_download
            || self.wants_translate
            || self.wants_upload
            || self.wants_report
            || self.wants_notify
    }

    /// True when the only processing asked for is the download itself.
    #[must_use]
    pub fn is_bare_download(&self) -> bool {
        self.wants_download && !self.wants_translate && !self.wants_upload && !self.wants_report
    }

    /// True when no trigger fired.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Trigger::ALL.iter().all(|trigger| !self.get(*trigger))
    }
}

/// Derives intent flags from raw request text.
#[must_use]
pub fn classify(text: &str) -> IntentFlags {
    let lowered = text.to_lowercase();
    IntentFlags {
        wants_download: Trigger::Download.matches(&lowered),
        wants_translate: Trigger::Translate.matches(&lowered),
        wants_upload: Trigger::Upload.matches(&lowered),
        wants_report: Trigger::Report.matches(&lowered),
        wants_notify: Trigger::Notify.matches(&lowered),
        wants_edit: Trigger::Edit.matches(&lowered),
    }
}
