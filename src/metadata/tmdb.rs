use super::{EpisodeInfo, Metadata, MetadataProvider};
use crate::config::MetadataConfig;
use crate::utils::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const TMDB_API_BASE: &str = "https://api.themoviedb.org/3";

#[derive(Debug, Deserialize)]
struct SearchResponse<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
struct MovieResult {
    id: u64,
    title: String,
    #[serde(default)]
    release_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct TvResult {
    id: u64,
    name: String,
    #[serde(default)]
    first_air_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeasonResponse {
    #[serde(default)]
    episodes: Vec<EpisodeResult>,
}

#[derive(Debug, Deserialize)]
struct EpisodeResult {
    episode_number: u32,
    season_number: u32,
    #[serde(default)]
    name: String,
}

/// Pulls the year out of TMDB's `YYYY-MM-DD` dates.
fn year_of(date: Option<&str>) -> Option<u16> {
    date.and_then(|d| d.get(0..4)).and_then(|y| y.parse().ok())
}

/// Picks the best candidate: exact title and year, then exact title, then
/// matching year, then the provider's own ranking.
fn best_match(candidates: Vec<Metadata>, title: &str, year: Option<u16>) -> Option<Metadata> {
    let same_title = |m: &Metadata| m.title.eq_ignore_ascii_case(title.trim());
    let same_year = |m: &Metadata| year.is_some() && m.year == year;

    candidates
        .iter()
        .find(|m| same_title(*m) && same_year(*m))
        .or_else(|| candidates.iter().find(|m| same_title(*m)))
        .or_else(|| candidates.iter().find(|m| same_year(*m)))
        .or_else(|| candidates.first())
        .cloned()
}

fn parse_movie_search(body: &str, title: &str, year: Option<u16>) -> Result<Option<Metadata>> {
    let response: SearchResponse<MovieResult> = serde_json::from_str(body)?;
    let candidates = response
        .results
        .into_iter()
        .map(|r| Metadata {
            title: r.title,
            year: year_of(r.release_date.as_deref()),
            is_tv: false,
            provider_id: Some(r.id),
        })
        .collect();
    Ok(best_match(candidates, title, year))
}

fn parse_tv_search(body: &str, title: &str, year: Option<u16>) -> Result<Option<Metadata>> {
    let response: SearchResponse<TvResult> = serde_json::from_str(body)?;
    let candidates = response
        .results
        .into_iter()
        .map(|r| Metadata {
            title: r.name,
            year: year_of(r.first_air_date.as_deref()),
            is_tv: true,
            provider_id: Some(r.id),
        })
        .collect();
    Ok(best_match(candidates, title, year))
}

fn parse_season(body: &str) -> Result<Vec<EpisodeInfo>> {
    let response: SeasonResponse = serde_json::from_str(body)?;
    Ok(response
        .episodes
        .into_iter()
        .map(|e| EpisodeInfo {
            season: e.season_number,
            episode: e.episode_number,
            name: e.name,
        })
        .collect())
}

/// The Movie Database (TMDB) v3 client.
pub struct TmdbProvider {
    client: Client,
    api_key: String,
    language: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, config: &MetadataConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("disc-autorip/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_key,
            language: config.language.clone(),
        })
    }

    async fn get_json_text(&self, path: &str, params: &[(&str, String)]) -> Result<String> {
        let mut url = format!(
            "{}{}?api_key={}&language={}",
            TMDB_API_BASE,
            path,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&self.language)
        );
        for (key, value) in params {
            url.push_str(&format!("&{}={}", key, urlencoding::encode(value)));
        }

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Error::metadata(format!(
                "TMDB returned status {} for {}",
                response.status(),
                path
            )));
        }
        Ok(response.text().await?)
    }

    async fn search(&self, title: &str, is_tv: bool, year: Option<u16>) -> Result<Option<Metadata>> {
        let mut params = vec![("query", title.to_string())];
        let (path, year_param) = if is_tv {
            ("/search/tv", "first_air_date_year")
        } else {
            ("/search/movie", "year")
        };
        if let Some(year) = year {
            params.push((year_param, year.to_string()));
        }

        let body = self.get_json_text(path, &params).await?;
        if is_tv {
            parse_tv_search(&body, title, year)
        } else {
            parse_movie_search(&body, title, year)
        }
    }

    async fn fetch_season(&self, tv_id: u64, season: u32) -> Result<Vec<EpisodeInfo>> {
        let body = self
            .get_json_text(&format!("/tv/{}/season/{}", tv_id, season), &[])
            .await?;
        parse_season(&body)
    }
}

#[async_trait]
impl MetadataProvider for TmdbProvider {
    async fn lookup(&self, title: &str, is_tv: bool, year: Option<u16>) -> Option<Metadata> {
        match self.search(title, is_tv, year).await {
            Ok(Some(metadata)) => {
                debug!(
                    "TMDB matched '{}' to id {:?}",
                    title, metadata.provider_id
                );
                Some(metadata)
            }
            Ok(None) => {
                debug!("TMDB has no match for '{}'", title);
                None
            }
            Err(e) => {
                warn!("TMDB lookup for '{}' failed: {}", title, e);
                None
            }
        }
    }

    async fn episode_titles(&self, metadata: &Metadata, season: u32) -> Vec<EpisodeInfo> {
        let Some(tv_id) = metadata.provider_id.filter(|_| metadata.is_tv) else {
            return Vec::new();
        };

        match self.fetch_season(tv_id, season).await {
            Ok(episodes) => episodes,
            Err(e) => {
                warn!("TMDB season {} lookup for {} failed: {}", season, tv_id, e);
                Vec::new()
            }
        }
    }
}
