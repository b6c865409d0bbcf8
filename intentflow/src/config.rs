//! Engine configuration.
//!
//! Configuration is read from an optional JSON file and then overridden by
//! `INTENTFLOW_*` environment variables. Every field has a default, so an
//! empty object (or no file at all) is a valid configuration.

use crate::errors::{IntentflowError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding [`EngineConfig::request_timeout_secs`].
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "INTENTFLOW_REQUEST_TIMEOUT_SECS";
/// Environment variable overriding [`EngineConfig::step_pause_ms`].
pub const ENV_STEP_PAUSE_MS: &str = "INTENTFLOW_STEP_PAUSE_MS";
/// Environment variable overriding [`ToolsConfig::simulate_latency`].
pub const ENV_SIMULATE_LATENCY: &str = "INTENTFLOW_SIMULATE_LATENCY";
/// Environment variable overriding [`EngineConfig::log_level`].
pub const ENV_LOG_LEVEL: &str = "INTENTFLOW_LOG_LEVEL";

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Per-request deadline in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: f64,
    /// Pause between successful steps, in milliseconds.
    #[serde(default = "default_step_pause")]
    pub step_pause_ms: u64,
    /// Pause between batch scenarios, in milliseconds.
    #[serde(default = "default_scenario_pause")]
    pub scenario_pause_ms: u64,
    /// Fallback log level when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Built-in tool settings.
    #[serde(default)]
    pub tools: ToolsConfig,
}

fn default_request_timeout() -> f64 {
    300.0
}

fn default_step_pause() -> u64 {
    500
}

fn default_scenario_pause() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            step_pause_ms: default_step_pause(),
            scenario_pause_ms: default_scenario_pause(),
            log_level: default_log_level(),
            tools: ToolsConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration suited to tests: no simulated latency and no pauses.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            step_pause_ms: 0,
            scenario_pause_ms: 0,
            tools: ToolsConfig {
                simulate_latency: false,
                ..ToolsConfig::default()
            },
            ..Self::default()
        }
    }

    /// Loads configuration from `path` (if given) and applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
            .map_err(|e| IntentflowError::config(format!("{}: {e}", path.display())))
    }

    /// Parses and validates a JSON configuration document.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| IntentflowError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from a key lookup (the process environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            self.request_timeout_secs = parse_env(ENV_REQUEST_TIMEOUT_SECS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_STEP_PAUSE_MS) {
            self.step_pause_ms = parse_env(ENV_STEP_PAUSE_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SIMULATE_LATENCY) {
            self.tools.simulate_latency = parse_bool(ENV_SIMULATE_LATENCY, &raw)?;
        }
        if let Some(raw) = lookup(ENV_LOG_LEVEL) {
            self.log_level = raw.trim().to_string();
        }
        Ok(())
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.request_timeout_secs.is_finite() || self.request_timeout_secs <= 0.0 {
            return Err(IntentflowError::config(format!(
                "request_timeout_secs must be positive, got {}",
                self.request_timeout_secs
            )));
        }
        if !self.tools.latency_scale.is_finite() || self.tools.latency_scale < 0.0 {
            return Err(IntentflowError::config(format!(
                "tools.latency_scale must be non-negative, got {}",
                self.tools.latency_scale
            )));
        }
        Ok(())
    }

    /// Gets the request timeout as a Duration.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.request_timeout_secs)
    }

    /// Gets the inter-step pause as a Duration.
    #[must_use]
    pub fn step_pause(&self) -> Duration {
        Duration::from_millis(self.step_pause_ms)
    }

    /// Gets the inter-scenario pause as a Duration.
    #[must_use]
    pub fn scenario_pause(&self) -> Duration {
        Duration::from_millis(self.scenario_pause_ms)
    }
}

/// Settings for the built-in tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Whether tools sleep to imitate real work.
    #[serde(default = "default_simulate_latency")]
    pub simulate_latency: bool,
    /// Multiplier applied to each tool's nominal latency.
    #[serde(default = "default_latency_scale")]
    pub latency_scale: f64,
    /// Bucket endpoint the uploader reports objects under.
    #[serde(default = "default_upload_base_url")]
    pub upload_base_url: String,
}

fn default_simulate_latency() -> bool {
    true
}

fn default_latency_scale() -> f64 {
    1.0
}

fn default_upload_base_url() -> String {
    "https://my-bucket-1234567890.cos.ap-guangzhou.myqcloud.com".to_string()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            simulate_latency: default_simulate_latency(),
            latency_scale: default_latency_scale(),
            upload_base_url: default_upload_base_url(),
        }
    }
}

impl ToolsConfig {
    /// Scales a tool's nominal latency, or returns zero when simulation is off.
    #[must_use]
    pub fn latency(&self, nominal: Duration) -> Duration {
        if self.simulate_latency {
            nominal.mul_f64(self.latency_scale.max(0.0))
        } else {
            Duration::ZERO
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| IntentflowError::config(format!("{key}={raw:?}: {e}")))
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(IntentflowError::config(format!(
            "{key}={raw:?}: expected a boolean"
        ))),
    }
}
