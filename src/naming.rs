//! File and directory naming for ripped titles.
//!
//! Movies land in `<root>/<Title> (<Year>)/<Title> (<Year>).mkv`, episodes in
//! `<root>/<Series>/Season 01/<Series> - S01E02 - <Episode>.mkv`.

use crate::analysis::TitleRole;
use crate::metadata::Metadata;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

pub const OUTPUT_EXTENSION: &str = "mkv";
const UNTITLED: &str = "Untitled";

static INVALID_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>"/\\|?*\x00-\x1F]"#).expect("invalid character regex"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

// S02, S2D3
static SEASON_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^S(\d{1,2})(?:D(\d{1,2}))?$").expect("season token regex"));

// D1, DISC2, DISK3
static DISC_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^D(?:ISC|ISK)?(\d{1,2})$").expect("disc token regex"));

const LABEL_NOISE: &[&str] = &[
    "BLURAY", "BLU", "RAY", "BD", "DVD", "UHD", "4K", "WIDESCREEN", "FULLSCREEN", "WS", "FS",
];

const SMALL_WORDS: &[&str] = &["a", "an", "and", "at", "in", "of", "on", "or", "the", "to"];

/// What can be recovered from a volume label such as `FRIENDS_S2_D1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelInfo {
    pub title: String,
    pub season: Option<u32>,
    pub disc: Option<u32>,
}

/// Makes free text safe to use as a single path component.
pub fn sanitize_filename(name: &str) -> String {
    let replaced = name.replace(':', " -");
    let spaced = WHITESPACE.replace_all(&replaced, " ");
    let stripped = INVALID_CHARS.replace_all(&spaced, "");
    let collapsed = WHITESPACE.replace_all(stripped.trim(), " ");
    let cleaned = collapsed.trim_end_matches(['.', ' ']).trim();

    if cleaned.is_empty() {
        UNTITLED.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Turns a shouting, underscore-separated disc label into a search title plus
/// any season/disc numbers embedded in it.
pub fn clean_disc_label(label: &str) -> LabelInfo {
    let normalized = label.replace(['_', '.', '-'], " ").to_uppercase();
    let tokens: Vec<&str> = normalized.split_whitespace().collect();

    let mut info = LabelInfo::default();
    let mut words = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i];
        let next_number = tokens.get(i + 1).and_then(|t| t.parse::<u32>().ok());

        match token {
            "SEASON" | "SERIES" if next_number.is_some() => {
                info.season = next_number;
                i += 2;
                continue;
            }
            "DISC" | "DISK" | "D" if next_number.is_some() => {
                info.disc = next_number;
                i += 2;
                continue;
            }
            _ => {}
        }

        if let Some(caps) = SEASON_TOKEN.captures(token) {
            info.season = caps[1].parse().ok();
            if let Some(disc) = caps.get(2) {
                info.disc = disc.as_str().parse().ok();
            }
        } else if let Some(caps) = DISC_TOKEN.captures(token) {
            info.disc = caps[1].parse().ok();
        } else if !LABEL_NOISE.contains(&token) {
            words.push(token);
        }
        i += 1;
    }

    info.title = title_case(&words);
    info
}

fn title_case(words: &[&str]) -> String {
    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i > 0 && SMALL_WORDS.contains(&lower.as_str()) {
                return lower;
            }
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `Title (Year)`, or just `Title` when the year is unknown.
pub fn movie_base_name(metadata: &Metadata) -> String {
    let title = sanitize_filename(&metadata.title);
    match metadata.year {
        Some(year) => format!("{} ({})", title, year),
        None => title,
    }
}

pub fn movie_file_name(metadata: &Metadata, version: Option<u32>) -> String {
    let base = movie_base_name(metadata);
    match version {
        Some(n) => format!("{} - Version {}.{}", base, n, OUTPUT_EXTENSION),
        None => format!("{}.{}", base, OUTPUT_EXTENSION),
    }
}

pub fn episode_file_name(
    series: &str,
    season: u32,
    episode: u32,
    episode_title: Option<&str>,
) -> String {
    let series = sanitize_filename(series);
    let mut name = format!("{} - S{:02}E{:02}", series, season, episode);
    if let Some(title) = episode_title.map(sanitize_filename) {
        if title != UNTITLED {
            name.push_str(" - ");
            name.push_str(&title);
        }
    }
    format!("{}.{}", name, OUTPUT_EXTENSION)
}

/// Full destination path for one ripped title under `root`.
pub fn output_path(
    root: &Path,
    metadata: &Metadata,
    role: TitleRole,
    episode_title: Option<&str>,
) -> PathBuf {
    match role {
        TitleRole::Feature { version } => root
            .join(movie_base_name(metadata))
            .join(movie_file_name(metadata, version)),
        TitleRole::Episode { season, episode } => root
            .join(sanitize_filename(&metadata.title))
            .join(format!("Season {:02}", season))
            .join(episode_file_name(
                &metadata.title,
                season,
                episode,
                episode_title,
            )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Mission: Impossible"), "Mission - Impossible");
        assert_eq!(sanitize_filename("AC/DC: Live at Donington"), "ACDC - Live at Donington");
        assert_eq!(sanitize_filename("What?!  Really*"), "What! Really");
        assert_eq!(sanitize_filename("Trailing dots..."), "Trailing dots");
        assert_eq!(sanitize_filename("  ...  "), UNTITLED);
        assert_eq!(sanitize_filename("Tab\tand\nnewline"), "Tab and newline");
    }

    #[test]
    fn test_clean_disc_label_movie() {
        assert_eq!(
            clean_disc_label("THE_MATRIX_DISC_1"),
            LabelInfo {
                title: "The Matrix".to_string(),
                season: None,
                disc: Some(1),
            }
        );
        assert_eq!(
            clean_disc_label("LORD_OF_THE_RINGS_BLURAY").title,
            "Lord of the Rings"
        );
    }

    #[test]
    fn test_clean_disc_label_series() {
        assert_eq!(
            clean_disc_label("Friends.S02.D3"),
            LabelInfo {
                title: "Friends".to_string(),
                season: Some(2),
                disc: Some(3),
            }
        );
        let info = clean_disc_label("BREAKING_BAD_SEASON_3_DISC_2");
        assert_eq!(info.title, "Breaking Bad");
        assert_eq!(info.season, Some(3));
        assert_eq!(info.disc, Some(2));

        assert_eq!(clean_disc_label("SOPRANOS_S1D4").season, Some(1));
    }

    #[test]
    fn test_clean_empty_label() {
        assert_eq!(clean_disc_label(""), LabelInfo::default());
    }

    #[test]
    fn test_movie_names() {
        let meta = Metadata::local("Blade Runner", false, Some(1982));
        assert_eq!(movie_file_name(&meta, None), "Blade Runner (1982).mkv");
        assert_eq!(
            movie_file_name(&meta, Some(2)),
            "Blade Runner (1982) - Version 2.mkv"
        );

        let no_year = Metadata::local("Blade Runner", false, None);
        assert_eq!(movie_file_name(&no_year, None), "Blade Runner.mkv");
    }

    #[test]
    fn test_episode_names() {
        assert_eq!(
            episode_file_name("Friends", 2, 1, Some("The One with Ross's New Girlfriend")),
            "Friends - S02E01 - The One with Ross's New Girlfriend.mkv"
        );
        assert_eq!(episode_file_name("Friends", 2, 12, None), "Friends - S02E12.mkv");
        assert_eq!(episode_file_name("Friends", 1, 3, Some("???")), "Friends - S01E03.mkv");
    }

    #[test]
    fn test_output_path_layout() {
        let root = Path::new("/media");
        let movie = Metadata::local("Heat", false, Some(1995));
        assert_eq!(
            output_path(root, &movie, TitleRole::Feature { version: None }, None),
            PathBuf::from("/media/Heat (1995)/Heat (1995).mkv")
        );

        let series = Metadata::local("Friends", true, Some(1994));
        assert_eq!(
            output_path(
                root,
                &series,
                TitleRole::Episode {
                    season: 2,
                    episode: 4
                },
                Some("The One with Phoebe's Husband")
            ),
            PathBuf::from("/media/Friends/Season 02/Friends - S02E04 - The One with Phoebe's Husband.mkv")
        );
    }
}
