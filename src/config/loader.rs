use super::types::*;
use crate::analysis::ContentKind;
use crate::utils::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub ripping: RippingConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)?;
        Self::from_yaml(&config_str)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `config_path` if it exists, otherwise the first default config
    /// found, otherwise built-in defaults.
    pub fn load_with_fallback<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();
        if config_path.exists() {
            return Self::load(config_path);
        }

        for candidate in Self::fallback_paths() {
            if candidate.exists() {
                debug!("Using configuration from {}", candidate.display());
                return Self::load(candidate);
            }
        }

        debug!("No configuration file found, using built-in defaults");
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    pub fn fallback_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("config.default.yaml"),
            PathBuf::from("./config/config.default.yaml"),
        ];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("autorip").join("config.yaml"));
        }
        paths
    }

    pub fn validate(&self) -> Result<()> {
        if self.tools.makemkvcon.trim().is_empty() {
            return Err(Error::validation("tools.makemkvcon must not be empty"));
        }

        if self.tools.timeout_seconds == 0 {
            return Err(Error::validation(
                "tools.timeout_seconds must be greater than 0",
            ));
        }

        if !(0.0..=1.0).contains(&self.detection.confidence_threshold) {
            return Err(Error::validation(format!(
                "detection.confidence_threshold must be between 0 and 1 (got {})",
                self.detection.confidence_threshold
            )));
        }

        if self.detection.fallback == ContentKind::Indeterminate {
            return Err(Error::validation(
                "detection.fallback must be 'movie' or 'series'",
            ));
        }

        if self.ripping.max_attempts == 0 {
            return Err(Error::validation(
                "ripping.max_attempts must be at least 1",
            ));
        }

        if self.metadata.timeout_seconds == 0 {
            return Err(Error::validation(
                "metadata.timeout_seconds must be greater than 0",
            ));
        }

        if !["trace", "debug", "info", "warn", "warning", "error"]
            .contains(&self.logging.level.to_lowercase().as_str())
        {
            return Err(Error::validation(format!(
                "Invalid logging.level: {}",
                self.logging.level
            )));
        }

        Ok(())
    }
}
