//! Thread-safe artifact bag shared by the steps of one run.

use parking_lot::RwLock;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Path of the media file later steps operate on.
pub const PRIMARY_MEDIA_PATH: &str = "primary_media_path";
/// Path of the clip cut by the editor.
pub const CLIP_PATH: &str = "clip_path";
/// Path of the generated subtitle file.
pub const SUBTITLE_PATH: &str = "subtitle_path";
/// Public URL of the uploaded object.
pub const UPLOADED_URL: &str = "uploaded_url";

/// Conventional name of the downloaded file before any step has run.
pub const DEFAULT_MEDIA_PATH: &str = "downloaded_video.mp4";

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("artifact reference pattern is valid")
    })
}

/// Formats a reference to a named artifact for use in a step input.
#[must_use]
pub fn artifact_ref(name: &str) -> String {
    format!("${{{name}}}")
}

/// Named string values published by steps and read by later steps.
///
/// Publishing an existing name overwrites it; the most recent producer wins.
#[derive(Debug, Default)]
pub struct ArtifactBag {
    values: RwLock<BTreeMap<String, String>>,
}

impl ArtifactBag {
    /// Creates a new empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bag seeded with the conventional defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        let bag = Self::new();
        bag.publish(PRIMARY_MEDIA_PATH, DEFAULT_MEDIA_PATH);
        bag
    }

    /// Gets an artifact value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        self.values.read().get(name).cloned()
    }

    /// Checks if an artifact exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.read().contains_key(name)
    }

    /// Publishes an artifact, replacing any previous value.
    pub fn publish(&self, name: impl Into<String>, value: impl Into<String>) {
        self.values.write().insert(name.into(), value.into());
    }

    /// Substitutes every `${name}` reference in `template`.
    ///
    /// # Errors
    ///
    /// Returns the name of the first reference with no published value.
    pub fn resolve(&self, template: &str) -> Result<String, String> {
        let values = self.values.read();
        let pattern = reference_pattern();

        if let Some(missing) = pattern
            .captures_iter(template)
            .map(|caps| caps[1].to_string())
            .find(|name| !values.contains_key(name))
        {
            return Err(missing);
        }

        Ok(pattern
            .replace_all(template, |caps: &regex::Captures<'_>| values[&caps[1]].clone())
            .into_owned())
    }

    /// Returns the number of artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Returns true if the bag is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}
