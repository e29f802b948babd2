use crate::analysis::ContentKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Parent directory for per-run work directories.
    pub temp_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            temp_dir: std::env::temp_dir().to_string_lossy().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub makemkvcon: String,
    /// Timeout for disc scans; rips scale it by disc type.
    pub timeout_seconds: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            makemkvcon: "makemkvcon".to_string(),
            timeout_seconds: 3600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub show_timestamps: bool,
    pub colored_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            show_timestamps: true,
            colored_output: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Automatic decisions below this confidence are confirmed with the user.
    pub confidence_threshold: f64,
    /// Used for undecided discs when nobody can be asked.
    pub fallback: ContentKind,
    pub prompt_when_uncertain: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.70,
            fallback: ContentKind::Movie,
            prompt_when_uncertain: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RippingConfig {
    /// Passed to makemkvcon as `--minlength`.
    pub min_title_seconds: u64,
    pub keep_temp_files: bool,
    pub show_progress: bool,
    /// Attempts per title, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles with each further attempt.
    pub retry_delay_seconds: u64,
}

impl Default for RippingConfig {
    fn default() -> Self {
        Self {
            min_title_seconds: 120,
            keep_temp_files: false,
            show_progress: true,
            max_attempts: 2,
            retry_delay_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    pub enabled: bool,
    /// Falls back to the `TMDB_API_KEY` environment variable.
    pub tmdb_api_key: Option<String>,
    pub language: String,
    pub timeout_seconds: u64,
}

impl MetadataConfig {
    pub fn resolved_api_key(&self) -> Option<String> {
        self.tmdb_api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var("TMDB_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tmdb_api_key: None,
            language: "en-US".to_string(),
            timeout_seconds: 10,
        }
    }
}
