use super::detector::thresholds::{ALTERNATE_CUT_RATIO, SHORT_MAX_SECONDS};
use super::detector::ContentKind;
use super::stats::median;
use crate::disc::TitleRecord;
use tracing::{debug, warn};

/// A series title longer than this multiple of the median episode is taken to
/// be a "play all" concatenation of the others.
pub const PLAY_ALL_MEDIAN_FACTOR: f64 = 1.5;
const MIN_EPISODES_FOR_PLAY_ALL_FILTER: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleRole {
    /// `version` is set when a disc carries more than one cut of the feature.
    Feature { version: Option<u32> },
    Episode { season: u32, episode: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedTitle {
    pub title: TitleRecord,
    pub role: TitleRole,
}

/// Picks the titles worth ripping once the disc has been classified.
#[derive(Debug, Clone, Copy)]
pub struct TitleSelector {
    season: u32,
    episode_start: u32,
}

impl TitleSelector {
    pub fn new(season: u32, episode_start: u32) -> Self {
        Self {
            season,
            episode_start,
        }
    }

    pub fn select(&self, titles: &[TitleRecord], kind: ContentKind) -> Vec<SelectedTitle> {
        match kind {
            ContentKind::Movie => self.select_features(titles),
            ContentKind::Series => self.select_episodes(titles),
            ContentKind::Indeterminate => {
                warn!("Refusing to select titles for an undecided disc");
                Vec::new()
            }
        }
    }

    fn select_features(&self, titles: &[TitleRecord]) -> Vec<SelectedTitle> {
        let mut by_length: Vec<&TitleRecord> = titles.iter().collect();
        by_length.sort_by(|a, b| {
            b.duration_seconds
                .cmp(&a.duration_seconds)
                .then(a.id.cmp(&b.id))
        });

        let Some(&longest) = by_length.first() else {
            return Vec::new();
        };

        let mut features = vec![longest];
        features.extend(by_length.iter().skip(1).copied().filter(|t| {
            t.duration_seconds > SHORT_MAX_SECONDS
                && (longest.duration_seconds as f64 / t.duration_seconds as f64)
                    < ALTERNATE_CUT_RATIO
        }));

        let versioned = features.len() > 1;
        debug!(
            "Selected {} feature title(s), longest is title {}",
            features.len(),
            longest.id
        );

        features
            .into_iter()
            .enumerate()
            .map(|(i, title)| SelectedTitle {
                title: title.clone(),
                role: TitleRole::Feature {
                    version: versioned.then_some(i as u32 + 1),
                },
            })
            .collect()
    }

    fn select_episodes(&self, titles: &[TitleRecord]) -> Vec<SelectedTitle> {
        let mut candidates: Vec<&TitleRecord> = titles
            .iter()
            .filter(|t| t.duration_seconds > SHORT_MAX_SECONDS)
            .collect();

        if candidates.is_empty() {
            // all titles are short, so treat every one of them as an episode
            candidates = titles.iter().collect();
        }

        if candidates.len() >= MIN_EPISODES_FOR_PLAY_ALL_FILTER {
            let durations: Vec<u64> = candidates.iter().map(|t| t.duration_seconds).collect();
            let limit = median(&durations) * PLAY_ALL_MEDIAN_FACTOR;
            candidates.retain(|t| {
                let keep = (t.duration_seconds as f64) <= limit;
                if !keep {
                    debug!(
                        "Skipping title {} ({}s): looks like a play-all title",
                        t.id, t.duration_seconds
                    );
                }
                keep
            });
        }

        candidates.sort_by_key(|t| t.id);

        candidates
            .into_iter()
            .enumerate()
            .map(|(i, title)| SelectedTitle {
                title: title.clone(),
                role: TitleRole::Episode {
                    season: self.season,
                    episode: self.episode_start + i as u32,
                },
            })
            .collect()
    }
}

impl Default for TitleSelector {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn titles(durations: &[u64]) -> Vec<TitleRecord> {
        durations
            .iter()
            .enumerate()
            .map(|(i, &d)| TitleRecord::new(i as u32, d))
            .collect()
    }

    fn ids(selection: &[SelectedTitle]) -> Vec<u32> {
        selection.iter().map(|s| s.title.id).collect()
    }

    #[test]
    fn test_movie_picks_longest_title() {
        let selection = TitleSelector::default().select(&titles(&[400, 5500, 300]), ContentKind::Movie);
        assert_eq!(ids(&selection), vec![1]);
        assert_eq!(selection[0].role, TitleRole::Feature { version: None });
    }

    #[test]
    fn test_movie_alternate_cuts_are_versioned() {
        let selection =
            TitleSelector::default().select(&titles(&[1850, 600, 1900]), ContentKind::Movie);
        assert_eq!(ids(&selection), vec![2, 0]);
        assert_eq!(selection[0].role, TitleRole::Feature { version: Some(1) });
        assert_eq!(selection[1].role, TitleRole::Feature { version: Some(2) });
    }

    #[test]
    fn test_series_numbers_episodes_in_disc_order() {
        let selection = TitleSelector::new(2, 5)
            .select(&titles(&[1450, 1500, 300, 1480]), ContentKind::Series);
        assert_eq!(ids(&selection), vec![0, 1, 3]);
        assert_eq!(
            selection[2].role,
            TitleRole::Episode {
                season: 2,
                episode: 7
            }
        );
    }

    #[test]
    fn test_series_drops_play_all_title() {
        let selection = TitleSelector::default()
            .select(&titles(&[5900, 1450, 1500, 1480, 1470]), ContentKind::Series);
        assert_eq!(ids(&selection), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_series_of_short_titles() {
        let selection = TitleSelector::default().select(&titles(&[600, 650, 620]), ContentKind::Series);
        assert_eq!(selection.len(), 3);
    }

    #[test]
    fn test_indeterminate_and_empty() {
        let selector = TitleSelector::default();
        assert!(selector.select(&titles(&[1000, 1200]), ContentKind::Indeterminate).is_empty());
        assert!(selector.select(&[], ContentKind::Movie).is_empty());
        assert!(selector.select(&[], ContentKind::Series).is_empty());
    }
}
