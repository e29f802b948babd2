pub mod makemkv;

pub use makemkv::MakeMkv;

use crate::utils::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single title track as reported by the disc reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleRecord {
    pub id: u32,
    pub duration_seconds: u64,
    pub chapter_count: Option<u32>,
    pub size_bytes: Option<u64>,
    pub file_name: Option<String>,
}

impl TitleRecord {
    pub fn new(id: u32, duration_seconds: u64) -> Self {
        Self {
            id,
            duration_seconds,
            chapter_count: None,
            size_bytes: None,
            file_name: None,
        }
    }

    pub fn duration_display(&self) -> String {
        format_duration(self.duration_seconds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscType {
    Dvd,
    Bluray,
    Uhd,
    Unknown,
}

impl DiscType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dvd => "dvd",
            Self::Bluray => "bluray",
            Self::Uhd => "uhd",
            Self::Unknown => "unknown",
        }
    }

    /// Maps the free-text disc type string printed by makemkvcon.
    pub fn from_makemkv(s: &str) -> Self {
        let lower = s.to_lowercase();
        if lower.contains("uhd") || lower.contains("ultra hd") {
            Self::Uhd
        } else if lower.contains("blu-ray") || lower.contains("bluray") {
            Self::Bluray
        } else if lower.contains("dvd") {
            Self::Dvd
        } else {
            Self::Unknown
        }
    }

    /// Scales the per-title rip timeout; larger discs take longer to read.
    pub fn timeout_multiplier(&self) -> u64 {
        match self {
            Self::Dvd => 1,
            Self::Bluray | Self::Unknown => 2,
            Self::Uhd => 4,
        }
    }
}

impl std::fmt::Display for DiscType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything read from a disc before classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscInfo {
    pub label: Option<String>,
    pub disc_type: DiscType,
    pub titles: Vec<TitleRecord>,
}

impl DiscInfo {
    pub fn new(titles: Vec<TitleRecord>) -> Self {
        Self {
            label: None,
            disc_type: DiscType::Unknown,
            titles,
        }
    }

    pub fn total_duration(&self) -> u64 {
        self.titles.iter().map(|t| t.duration_seconds).sum()
    }
}

/// Source argument understood by makemkvcon (`disc:0`, `dev:/dev/sr0`,
/// `iso:/path/image.iso`, `file:/path/BDMV_folder`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscSource(String);

impl DiscSource {
    const PREFIXES: [&'static str; 4] = ["disc:", "dev:", "iso:", "file:"];

    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::validation("Disc source must not be empty"));
        }

        if Self::PREFIXES.iter().any(|p| input.starts_with(p)) {
            return Ok(Self(input.to_string()));
        }

        if input.chars().all(|c| c.is_ascii_digit()) {
            return Ok(Self(format!("disc:{}", input)));
        }

        if input.starts_with("/dev/") {
            return Ok(Self(format!("dev:{}", input)));
        }

        let path = Path::new(input);
        let is_iso = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("iso"));

        if is_iso {
            Ok(Self(format!("iso:{}", input)))
        } else if path.is_dir() {
            Ok(Self(format!("file:{}", input)))
        } else {
            Err(Error::validation(format!(
                "Unrecognised disc source: {} (use disc:N, dev:/dev/srN, an .iso file or a disc folder)",
                input
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DiscSource {
    fn default() -> Self {
        Self("disc:0".to_string())
    }
}

impl std::fmt::Display for DiscSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait]
pub trait DiscReader: Send + Sync {
    async fn read_disc(&self, source: &DiscSource) -> Result<DiscInfo>;
}

#[async_trait]
pub trait RipExecutor: Send + Sync {
    /// Extracts one title into `dest_dir` and returns the tool's exit code.
    async fn rip_title(
        &self,
        source: &DiscSource,
        title_id: u32,
        dest_dir: &Path,
        disc_type: DiscType,
    ) -> Result<i32>;
}

pub fn format_duration(seconds: u64) -> String {
    format!(
        "{}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}
