//! URL and email extraction.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"https?://\S+").expect("url pattern is valid"))
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9_.%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
            .expect("email pattern is valid")
    })
}

/// Entities found in a request, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedEntities {
    /// Every URL, in order of appearance.
    pub urls: Vec<String>,
    /// Every email address, in order of appearance.
    pub emails: Vec<String>,
}

impl ExtractedEntities {
    /// The URL the request is about. Later URLs are ignored.
    #[must_use]
    pub fn primary_url(&self) -> Option<&str> {
        self.urls.first().map(String::as_str)
    }

    /// The notification recipient. Later addresses are ignored.
    #[must_use]
    pub fn primary_email(&self) -> Option<&str> {
        self.emails.first().map(String::as_str)
    }
}

/// Extracts URLs and email addresses from raw request text.
#[must_use]
pub fn extract(text: &str) -> ExtractedEntities {
    let collect = |pattern: &Regex| {
        pattern
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    };

    ExtractedEntities {
        urls: collect(url_pattern()),
        emails: collect(email_pattern()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_url_and_email() {
        let entities = extract("下载视频 https://example.com/video.mp4 并发送到 user@email.com");

        assert_eq!(entities.primary_url(), Some("https://example.com/video.mp4"));
        assert_eq!(entities.primary_email(), Some("user@email.com"));
    }

    #[test]
    fn test_url_runs_to_whitespace() {
        let entities = extract("请帮我下载视频 https://example.com/tutorial.mp4，翻译字幕");
        assert_eq!(entities.urls, vec!["https://example.com/tutorial.mp4，翻译字幕"]);
    }

    #[test]
    fn test_email_stops_at_non_ascii() {
        let entities = extract("完成后发邮件给translator@team.com谢谢");
        assert_eq!(entities.emails, vec!["translator@team.com"]);
    }

    #[test]
    fn test_all_matches_kept_in_order() {
        let entities = extract("http://a.com/1 https://b.com/2 x@a.io y@b.org");

        assert_eq!(entities.urls, vec!["http://a.com/1", "https://b.com/2"]);
        assert_eq!(entities.emails, vec!["x@a.io", "y@b.org"]);
        assert_eq!(entities.primary_url(), Some("http://a.com/1"));
    }

    #[test]
    fn test_nothing_found() {
        let entities = extract("帮我处理一下视频");
        assert_eq!(entities, ExtractedEntities::default());
        assert!(entities.primary_url().is_none());
    }

    #[test]
    fn test_short_tld_is_not_an_email() {
        assert!(extract("me@host.c").emails.is_empty());
        assert!(extract("ftp://files.com/x.mp4").urls.is_empty());
    }
}
