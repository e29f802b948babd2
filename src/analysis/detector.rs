//! Movie/series classification from title durations alone.
//!
//! The detector looks only at the shape of a disc: how many titles it has and
//! how long they are. It never consults external metadata, so it can run
//! before anything is ripped and before the title of the disc is known.

use super::stats::coefficient_of_variation;
use crate::disc::TitleRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tunable policy of the detector. Durations are in seconds.
pub mod thresholds {
    /// Titles at or below this length are bonus material or chapter noise.
    pub const SHORT_MAX_SECONDS: u64 = 900;
    /// Inclusive band of canonical episode lengths (20 to 55 minutes).
    pub const EPISODE_MIN_SECONDS: u64 = 1200;
    pub const EPISODE_MAX_SECONDS: u64 = 3300;
    /// Titles strictly longer than this are feature length.
    pub const FEATURE_MIN_SECONDS: u64 = 4800;
    /// Both titles of a pair must exceed this to count as alternate cuts.
    pub const ALTERNATE_CUT_MIN_SECONDS: u64 = 1800;

    /// Longer title at least this many times the shorter: feature plus bonus.
    pub const BONUS_RATIO: f64 = 3.0;
    /// Longer/shorter below this: two cuts of one feature.
    pub const ALTERNATE_CUT_RATIO: f64 = 1.3;

    pub const MIN_EPISODE_COUNT: usize = 3;
    /// Fraction of all titles that must fall in the episode band.
    pub const EPISODE_SHARE: f64 = 0.6;
    pub const EPISODE_CV_TIGHT: f64 = 0.15;
    pub const EPISODE_CV_LOOSE: f64 = 0.25;
    pub const SUBSTANTIAL_CV_MAX: f64 = 0.18;

    pub const MIN_TITLES_FOR_FEATURE_WITH_EXTRAS: usize = 4;
    pub const MIN_SHORTS_FOR_FEATURE_WITH_EXTRAS: usize = 2;
    pub const MIN_SHORTS_FOR_SHORTS_DOMINATED: usize = 3;
    pub const MAX_SUBSTANTIAL_FOR_SHORTS_DOMINATED: usize = 2;

    pub const CONFIDENCE_SINGLE_TITLE: f64 = 0.95;
    pub const CONFIDENCE_FEATURE_WITH_BONUS: f64 = 0.85;
    pub const CONFIDENCE_ALTERNATE_CUTS: f64 = 0.75;
    pub const CONFIDENCE_UNIFORM_EPISODES: f64 = 0.92;
    pub const CONFIDENCE_SIMILAR_EPISODES: f64 = 0.78;
    pub const CONFIDENCE_FEATURE_WITH_EXTRAS: f64 = 0.85;
    pub const CONFIDENCE_TWO_FEATURE_PARTS: f64 = 0.75;
    pub const CONFIDENCE_UNIFORM_SUBSTANTIAL: f64 = 0.80;
    pub const CONFIDENCE_SHORTS_DOMINATED: f64 = 0.70;
    pub const CONFIDENCE_UNDECIDED: f64 = 0.5;
    pub const CONFIDENCE_NONE: f64 = 0.0;
}

use thresholds::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Movie,
    Series,
    Indeterminate,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Indeterminate => "indeterminate",
        }
    }

    pub fn is_determined(&self) -> bool {
        !matches!(self, Self::Indeterminate)
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which branch of the cascade produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionRule {
    NoTitles,
    SingleTitle,
    FeatureWithBonus,
    AlternateCuts,
    AmbiguousPair,
    UniformEpisodes,
    SimilarEpisodes,
    FeatureWithExtras,
    TwoFeatureParts,
    UniformSubstantialTitles,
    ShortsDominated,
    NoMatch,
}

impl DetectionRule {
    pub fn description(&self) -> &'static str {
        match self {
            Self::NoTitles => "disc has no titles",
            Self::SingleTitle => "single title",
            Self::FeatureWithBonus => "main feature with a short bonus title",
            Self::AlternateCuts => "two near-equal cuts of one feature",
            Self::AmbiguousPair => "two titles with no clear relationship",
            Self::UniformEpisodes => "episode-length titles with very uniform durations",
            Self::SimilarEpisodes => "episode-length titles with similar durations",
            Self::FeatureWithExtras => "one feature-length title with several extras",
            Self::TwoFeatureParts => "two feature-length titles",
            Self::UniformSubstantialTitles => "uniform substantial titles without extras",
            Self::ShortsDominated => "mostly short titles around at most two long ones",
            Self::NoMatch => "no rule matched",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentClassification {
    pub kind: ContentKind,
    /// In `[0.0, 1.0]`.
    pub confidence: f64,
    pub rule: DetectionRule,
}

impl ContentClassification {
    fn new(kind: ContentKind, confidence: f64, rule: DetectionRule) -> Self {
        Self {
            kind,
            confidence,
            rule,
        }
    }
}

/// Title durations sorted into the buckets the cascade reasons about.
/// A title may sit in several buckets at once.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DurationBuckets {
    pub short: Vec<u64>,
    pub episode_length: Vec<u64>,
    pub long: Vec<u64>,
    pub substantial: Vec<u64>,
}

impl DurationBuckets {
    pub fn from_titles(titles: &[TitleRecord]) -> Self {
        let mut buckets = Self::default();

        for duration in titles.iter().map(|t| t.duration_seconds) {
            if duration <= SHORT_MAX_SECONDS {
                buckets.short.push(duration);
            } else {
                buckets.substantial.push(duration);
            }

            if (EPISODE_MIN_SECONDS..=EPISODE_MAX_SECONDS).contains(&duration) {
                buckets.episode_length.push(duration);
            }

            if duration > FEATURE_MIN_SECONDS {
                buckets.long.push(duration);
            }
        }

        buckets
    }
}

/// Stateless classifier; every call returns its own confidence, so one
/// instance can be shared freely across discs and threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentTypeDetector;

impl ContentTypeDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn detect(&self, titles: &[TitleRecord]) -> ContentClassification {
        let classification = match titles.len() {
            0 => ContentClassification::new(
                ContentKind::Indeterminate,
                CONFIDENCE_NONE,
                DetectionRule::NoTitles,
            ),
            1 => ContentClassification::new(
                ContentKind::Movie,
                CONFIDENCE_SINGLE_TITLE,
                DetectionRule::SingleTitle,
            ),
            2 => self.classify_pair(titles[0].duration_seconds, titles[1].duration_seconds),
            _ => self.classify_many(titles),
        };

        debug!(
            "Content detection over {} title(s): {} ({:.2}, {})",
            titles.len(),
            classification.kind,
            classification.confidence,
            classification.rule.description()
        );

        classification
    }

    fn classify_pair(&self, a: u64, b: u64) -> ContentClassification {
        let (longer, shorter) = if a >= b { (a, b) } else { (b, a) };

        if longer as f64 >= BONUS_RATIO * shorter as f64 {
            return ContentClassification::new(
                ContentKind::Movie,
                CONFIDENCE_FEATURE_WITH_BONUS,
                DetectionRule::FeatureWithBonus,
            );
        }

        if shorter > ALTERNATE_CUT_MIN_SECONDS
            && (longer as f64 / shorter as f64) < ALTERNATE_CUT_RATIO
        {
            return ContentClassification::new(
                ContentKind::Movie,
                CONFIDENCE_ALTERNATE_CUTS,
                DetectionRule::AlternateCuts,
            );
        }

        ContentClassification::new(
            ContentKind::Indeterminate,
            CONFIDENCE_UNDECIDED,
            DetectionRule::AmbiguousPair,
        )
    }

    /// First matching rule wins; the order is part of the policy.
    fn classify_many(&self, titles: &[TitleRecord]) -> ContentClassification {
        let total = titles.len();
        let buckets = DurationBuckets::from_titles(titles);

        debug!(
            "Duration buckets: {} short, {} episode-length, {} long, {} substantial",
            buckets.short.len(),
            buckets.episode_length.len(),
            buckets.long.len(),
            buckets.substantial.len()
        );

        let episodes = buckets.episode_length.len();
        if episodes >= MIN_EPISODE_COUNT && episodes as f64 >= EPISODE_SHARE * total as f64 {
            let cv = coefficient_of_variation(&buckets.episode_length);
            debug!("Episode-length duration CV: {:.3}", cv);

            if cv < EPISODE_CV_TIGHT {
                return ContentClassification::new(
                    ContentKind::Series,
                    CONFIDENCE_UNIFORM_EPISODES,
                    DetectionRule::UniformEpisodes,
                );
            }
            if cv < EPISODE_CV_LOOSE {
                return ContentClassification::new(
                    ContentKind::Series,
                    CONFIDENCE_SIMILAR_EPISODES,
                    DetectionRule::SimilarEpisodes,
                );
            }
        }

        if buckets.long.len() == 1
            && buckets.short.len() >= MIN_SHORTS_FOR_FEATURE_WITH_EXTRAS
            && total >= MIN_TITLES_FOR_FEATURE_WITH_EXTRAS
        {
            return ContentClassification::new(
                ContentKind::Movie,
                CONFIDENCE_FEATURE_WITH_EXTRAS,
                DetectionRule::FeatureWithExtras,
            );
        }

        if buckets.long.len() == 2 && episodes <= 1 {
            return ContentClassification::new(
                ContentKind::Movie,
                CONFIDENCE_TWO_FEATURE_PARTS,
                DetectionRule::TwoFeatureParts,
            );
        }

        if buckets.substantial.len() >= MIN_EPISODE_COUNT && buckets.short.is_empty() {
            let cv = coefficient_of_variation(&buckets.substantial);
            debug!("Substantial-title duration CV: {:.3}", cv);

            if cv < SUBSTANTIAL_CV_MAX {
                return ContentClassification::new(
                    ContentKind::Series,
                    CONFIDENCE_UNIFORM_SUBSTANTIAL,
                    DetectionRule::UniformSubstantialTitles,
                );
            }
        }

        if buckets.short.len() >= MIN_SHORTS_FOR_SHORTS_DOMINATED
            && buckets.substantial.len() <= MAX_SUBSTANTIAL_FOR_SHORTS_DOMINATED
        {
            return ContentClassification::new(
                ContentKind::Movie,
                CONFIDENCE_SHORTS_DOMINATED,
                DetectionRule::ShortsDominated,
            );
        }

        ContentClassification::new(
            ContentKind::Indeterminate,
            CONFIDENCE_UNDECIDED,
            DetectionRule::NoMatch,
        )
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

    fn detect(durations: &[u64]) -> ContentClassification {
        ContentTypeDetector::new().detect(&titles(durations))
    }

    #[test]
    fn test_empty_disc_is_indeterminate() {
        let result = detect(&[]);
        assert_eq!(result.kind, ContentKind::Indeterminate);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.rule, DetectionRule::NoTitles);
    }

    #[test]
    fn test_single_title_is_movie() {
        for duration in [0, 600, 7200] {
            let result = detect(&[duration]);
            assert_eq!(result.kind, ContentKind::Movie);
            assert_eq!(result.confidence, 0.95);
        }
    }

    #[test]
    fn test_pair_feature_with_bonus() {
        let result = detect(&[5400, 1800]);
        assert_eq!(result.kind, ContentKind::Movie);
        assert_eq!(result.confidence, 0.85);

        // order does not matter
        assert_eq!(detect(&[1800, 5400]), result);
    }

    #[test]
    fn test_pair_alternate_cuts() {
        let result = detect(&[1850, 1900]);
        assert_eq!(result.kind, ContentKind::Movie);
        assert_eq!(result.confidence, 0.75);
        assert_eq!(result.rule, DetectionRule::AlternateCuts);
    }

    #[test]
    fn test_pair_ambiguous() {
        let result = detect(&[1000, 1200]);
        assert_eq!(result.kind, ContentKind::Indeterminate);
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn test_pair_requires_both_above_half_hour_for_cuts() {
        // ratio < 1.3 but the shorter one is exactly 30 minutes
        let result = detect(&[1800, 2000]);
        assert_eq!(result.kind, ContentKind::Indeterminate);
    }

    #[test]
    fn test_pair_ratio_of_exactly_cut_limit_is_ambiguous() {
        let result = detect(&[2000, 2600]);
        assert_eq!(result.kind, ContentKind::Indeterminate);
        assert_eq!(result.rule, DetectionRule::AmbiguousPair);
    }

    #[test]
    fn test_pair_with_zero_length_title() {
        let result = detect(&[0, 3000]);
        assert_eq!(result.rule, DetectionRule::FeatureWithBonus);
    }

    #[test]
    fn test_pair_never_series() {
        for pair in [[1400, 1450], [2500, 2600], [1300, 3200]] {
            assert_ne!(detect(&pair).kind, ContentKind::Series);
        }
    }

    #[test]
    fn test_uniform_episodes() {
        let result = detect(&[1450, 1500, 1520, 1480]);
        assert_eq!(result.kind, ContentKind::Series);
        assert_eq!(result.confidence, 0.92);
        assert_eq!(result.rule, DetectionRule::UniformEpisodes);
    }

    #[test]
    fn test_similar_episodes() {
        // CV is roughly 0.16
        let result = detect(&[1300, 1700, 2000, 1500]);
        assert_eq!(result.kind, ContentKind::Series);
        assert_eq!(result.confidence, 0.78);
        assert_eq!(result.rule, DetectionRule::SimilarEpisodes);
    }

    #[test]
    fn test_episode_rule_needs_majority() {
        // three episode-length titles out of six is below the 60% share
        let result = detect(&[1450, 1500, 1480, 300, 200, 250]);
        assert_ne!(result.rule, DetectionRule::UniformEpisodes);
        assert_eq!(result.kind, ContentKind::Indeterminate);
    }

    #[test]
    fn test_episode_rule_at_exact_majority_share() {
        // three of five titles is exactly 60%
        let result = detect(&[1450, 1500, 1480, 300, 200]);
        assert_eq!(result.kind, ContentKind::Series);
        assert_eq!(result.confidence, 0.92);
        assert_eq!(result.rule, DetectionRule::UniformEpisodes);
    }

    #[test]
    fn test_feature_with_extras() {
        let result = detect(&[5500, 400, 500, 300]);
        assert_eq!(result.kind, ContentKind::Movie);
        assert_eq!(result.confidence, 0.85);
        assert_eq!(result.rule, DetectionRule::FeatureWithExtras);
    }

    #[test]
    fn test_two_feature_parts() {
        let result = detect(&[6000, 5900, 600]);
        assert_eq!(result.kind, ContentKind::Movie);
        assert_eq!(result.confidence, 0.75);
        assert_eq!(result.rule, DetectionRule::TwoFeatureParts);
    }

    #[test]
    fn test_uniform_substantial_titles() {
        // hour-long episodes sit outside the episode band
        let result = detect(&[3500, 3550, 3600]);
        assert_eq!(result.kind, ContentKind::Series);
        assert_eq!(result.confidence, 0.80);
        assert_eq!(result.rule, DetectionRule::UniformSubstantialTitles);
    }

    #[test]
    fn test_high_cv_episodes_fall_through_to_substantial_rule() {
        // episode band CV is high, substantial set (same titles) too: no series
        let result = detect(&[1200, 3300, 1250]);
        assert_eq!(result.kind, ContentKind::Indeterminate);
        assert_eq!(result.rule, DetectionRule::NoMatch);
    }

    #[test]
    fn test_shorts_dominated() {
        let result = detect(&[4000, 300, 400, 500]);
        assert_eq!(result.kind, ContentKind::Movie);
        assert_eq!(result.confidence, 0.70);
        assert_eq!(result.rule, DetectionRule::ShortsDominated);
    }

    #[test]
    fn test_unclassifiable_three_titles() {
        let result = detect(&[1800, 2400, 4200]);
        assert_eq!(result.kind, ContentKind::Indeterminate);
        assert!(result.confidence <= 0.8);
    }

    #[test]
    fn test_detect_is_idempotent() {
        let detector = ContentTypeDetector::new();
        let sample = titles(&[1450, 1500, 1520, 1480, 300]);
        assert_eq!(detector.detect(&sample), detector.detect(&sample));
    }

    #[test]
    fn test_input_order_is_irrelevant() {
        assert_eq!(
            detect(&[300, 5500, 500, 400]).kind,
            detect(&[5500, 400, 500, 300]).kind
        );
    }

    #[test]
    fn test_buckets_overlap() {
        let buckets = DurationBuckets::from_titles(&titles(&[900, 901, 1200, 3300, 4800, 4801]));
        assert_eq!(buckets.short, vec![900]);
        assert_eq!(buckets.substantial, vec![901, 1200, 3300, 4800, 4801]);
        assert_eq!(buckets.episode_length, vec![1200, 3300]);
        assert_eq!(buckets.long, vec![4801]);
    }

    #[test]
    fn test_confidence_always_in_unit_range() {
        let samples: [&[u64]; 6] = [
            &[],
            &[1],
            &[10, 20],
            &[1, 2, 3],
            &[5000, 5000, 5000, 5000],
            &[0, 0, 0, 0, 0],
        ];
        for sample in samples {
            let c = detect(sample).confidence;
            assert!((0.0..=1.0).contains(&c));
        }
    }
}
