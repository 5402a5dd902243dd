//! Configuration types.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BspecConfig {
    /// Rendering defaults.
    pub output: OutputConfig,
    /// Defaults applied when initializing a new archive project.
    pub project: ProjectConfig,
    /// Logging defaults.
    pub log: LogSettings,
}

/// Output rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// `json`, `yaml` or `markdown` (aliases `yml` and `md`).
    pub format: String,
    /// Indent structured output.
    pub pretty: bool,
    /// Character budget for body excerpts in query listings.
    pub excerpt_length: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "markdown".to_string(),
            pretty: true,
            excerpt_length: 200,
        }
    }
}

/// Project defaults used by `init`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub author: String,
    pub conformance_level: String,
    pub industry_profile: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            author: "Unknown".to_string(),
            conformance_level: "bronze".to_string(),
            industry_profile: "software-saas".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    /// `pretty`, `compact` or `json`.
    pub format: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}
