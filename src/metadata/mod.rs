//! Metadata lookups used to name ripped files.
//!
//! Providers never fail across this boundary: a lookup that errors, times
//! out or finds nothing simply yields no metadata, and the rip carries on
//! with names derived from the disc itself.

pub mod tmdb;

pub use tmdb::TmdbProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    pub year: Option<u16>,
    pub is_tv: bool,
    pub provider_id: Option<u64>,
}

impl Metadata {
    /// Metadata made up from user input or the disc label alone.
    pub fn local(title: &str, is_tv: bool, year: Option<u16>) -> Self {
        Self {
            title: title.to_string(),
            year,
            is_tv,
            provider_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeInfo {
    pub season: u32,
    pub episode: u32,
    pub name: String,
}

#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn lookup(&self, title: &str, is_tv: bool, year: Option<u16>) -> Option<Metadata>;

    /// Episode names of one season; empty when unknown.
    async fn episode_titles(&self, metadata: &Metadata, season: u32) -> Vec<EpisodeInfo>;
}

/// Provider used when lookups are disabled or no API key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMetadata;

#[async_trait]
impl MetadataProvider for NoMetadata {
    async fn lookup(&self, _title: &str, _is_tv: bool, _year: Option<u16>) -> Option<Metadata> {
        None
    }

    async fn episode_titles(&self, _metadata: &Metadata, _season: u32) -> Vec<EpisodeInfo> {
        Vec::new()
    }
}

/// Finds the episode name for `episode` within a looked-up season.
pub fn episode_name(episodes: &[EpisodeInfo], season: u32, episode: u32) -> Option<&str> {
    episodes
        .iter()
        .find(|e| e.season == season && e.episode == episode)
        .map(|e| e.name.as_str())
        .filter(|name| !name.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_metadata_provider() {
        let provider = NoMetadata;
        assert!(provider.lookup("The Matrix", false, Some(1999)).await.is_none());
        let meta = Metadata::local("Friends", true, None);
        assert!(provider.episode_titles(&meta, 1).await.is_empty());
    }

    #[test]
    fn test_episode_name() {
        let episodes = vec![
            EpisodeInfo {
                season: 2,
                episode: 1,
                name: "The One with Ross's New Girlfriend".to_string(),
            },
            EpisodeInfo {
                season: 2,
                episode: 2,
                name: " ".to_string(),
            },
        ];
        assert_eq!(
            episode_name(&episodes, 2, 1),
            Some("The One with Ross's New Girlfriend")
        );
        assert_eq!(episode_name(&episodes, 2, 2), None);
        assert_eq!(episode_name(&episodes, 1, 1), None);
    }
}
