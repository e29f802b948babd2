pub mod prompt;

pub use prompt::{ContentPrompt, NoPrompt, TerminalPrompt};

use crate::{
    analysis::{ContentKind, ContentTypeDetector, SelectedTitle, TitleRole, TitleSelector},
    cli::CliArgs,
    config::Config,
    disc::{DiscInfo, DiscReader, DiscSource, DiscType, RipExecutor},
    metadata::{episode_name, EpisodeInfo, Metadata, MetadataProvider},
    naming::{clean_disc_label, output_path, LabelInfo},
    utils::{
        filesystem::get_file_size,
        logging::{log_classification, log_disc_scan, log_output_named, log_rip_complete, log_rip_start},
        create_work_dir, find_rip_outputs, format_file_size, move_file, unique_path, Error, Result,
    },
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

const FALLBACK_SEARCH_TITLE: &str = "Untitled Disc";

/// Everything a single run needs besides the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RipOptions {
    pub source: DiscSource,
    pub output_dir: PathBuf,
    pub temp_dir: PathBuf,
    /// Bypasses detection when set.
    pub forced_kind: Option<ContentKind>,
    pub title: Option<String>,
    pub year: Option<u16>,
    pub season: Option<u32>,
    pub episode_start: u32,
    pub disc_type: Option<DiscType>,
}

impl RipOptions {
    pub fn from_args(args: &CliArgs, config: &Config) -> Result<Self> {
        let output_dir = args
            .output
            .clone()
            .ok_or_else(|| Error::validation("--output is required for ripping"))?;

        Ok(Self {
            source: args.disc_source()?,
            output_dir,
            temp_dir: args
                .temp
                .clone()
                .unwrap_or_else(|| PathBuf::from(&config.app.temp_dir)),
            forced_kind: args.forced_kind(),
            title: args.title.clone(),
            year: args.year,
            season: args.season,
            episode_start: args.episode_start,
            disc_type: args.disc_type.as_override(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RipSummary {
    pub kind: ContentKind,
    pub metadata: Metadata,
    pub saved: Vec<PathBuf>,
    /// Title id and the reason it failed.
    pub failed: Vec<(u32, String)>,
}

pub struct RipWorkflow<'a> {
    reader: &'a dyn DiscReader,
    ripper: &'a dyn RipExecutor,
    metadata: &'a dyn MetadataProvider,
    prompt: &'a dyn ContentPrompt,
    config: &'a Config,
    detector: ContentTypeDetector,
}

impl<'a> RipWorkflow<'a> {
    pub fn new(
        reader: &'a dyn DiscReader,
        ripper: &'a dyn RipExecutor,
        metadata: &'a dyn MetadataProvider,
        prompt: &'a dyn ContentPrompt,
        config: &'a Config,
    ) -> Self {
        Self {
            reader,
            ripper,
            metadata,
            prompt,
            config,
            detector: ContentTypeDetector::new(),
        }
    }

    pub async fn run(&self, options: &RipOptions) -> Result<RipSummary> {
        info!("Processing disc {}", options.source);

        let disc = self.scan(options).await?;
        if disc.titles.is_empty() {
            return Err(Error::disc_read(format!(
                "No titles found on {} (minimum length {}s)",
                options.source, self.config.ripping.min_title_seconds
            )));
        }

        let kind = self.decide_kind(&disc, options.forced_kind);
        let label = disc
            .label
            .as_deref()
            .map(clean_disc_label)
            .unwrap_or_default();
        let season = options.season.or(label.season).unwrap_or(1);

        let selected = TitleSelector::new(season, options.episode_start).select(&disc.titles, kind);
        if selected.is_empty() {
            return Err(Error::rip("No titles selected for ripping"));
        }
        info!(
            "Selected {} title(s): {}",
            selected.len(),
            selected
                .iter()
                .map(|s| s.title.id.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let metadata = self.resolve_metadata(options, &label, kind).await;
        let episodes = if kind == ContentKind::Series {
            self.metadata.episode_titles(&metadata, season).await
        } else {
            Vec::new()
        };

        let work_dir = create_work_dir(&options.temp_dir)?;
        info!("Starting rip of {} title(s)", selected.len());

        let mut saved = Vec::new();
        let mut failed = Vec::new();
        for (index, selection) in selected.iter().enumerate() {
            log_rip_start(&selection.title, index + 1, selected.len());
            match self
                .rip_selected(options, &disc, selection, &work_dir, &metadata, &episodes)
                .await
            {
                Ok(path) => saved.push(path),
                Err(e) => {
                    error!("Title {} failed: {}", selection.title.id, e);
                    failed.push((selection.title.id, e.to_string()));
                }
            }
        }

        self.cleanup(&work_dir);
        info!(
            "Ripping complete: {} succeeded, {} failed",
            saved.len(),
            failed.len()
        );

        if saved.is_empty() {
            return Err(Error::rip(format!(
                "All {} selected title(s) failed to rip",
                failed.len()
            )));
        }

        Ok(RipSummary {
            kind,
            metadata,
            saved,
            failed,
        })
    }

    async fn scan(&self, options: &RipOptions) -> Result<DiscInfo> {
        info!("Scanning disc {}", options.source);
        let mut disc = self.reader.read_disc(&options.source).await?;

        if let Some(disc_type) = options.disc_type {
            if disc_type != disc.disc_type {
                info!(
                    "Disc type overridden: {} -> {}",
                    disc.disc_type, disc_type
                );
            }
            disc.disc_type = disc_type;
        }

        log_disc_scan(&disc);
        Ok(disc)
    }

    /// Forced kind, else a confident detection, else the user, else config.
    fn decide_kind(&self, disc: &DiscInfo, forced: Option<ContentKind>) -> ContentKind {
        if let Some(kind) = forced.filter(|k| k.is_determined()) {
            info!("Content type forced to {} by command line", kind);
            return kind;
        }

        let classification = self.detector.detect(&disc.titles);
        log_classification(&classification);

        let detection = &self.config.detection;
        if classification.kind.is_determined()
            && classification.confidence >= detection.confidence_threshold
        {
            return classification.kind;
        }

        if detection.prompt_when_uncertain {
            if let Some(kind) = self.prompt.ask(&classification) {
                info!("Content type chosen by user: {}", kind);
                return kind;
            }
        }

        warn!(
            "Content type chosen by fallback: {} (detected {} at {:.2}, threshold {:.2})",
            detection.fallback,
            classification.kind,
            classification.confidence,
            detection.confidence_threshold
        );
        detection.fallback
    }

    async fn resolve_metadata(
        &self,
        options: &RipOptions,
        label: &LabelInfo,
        kind: ContentKind,
    ) -> Metadata {
        let is_tv = kind == ContentKind::Series;
        let query = options
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .or_else(|| Some(label.title.as_str()).filter(|t| !t.is_empty()))
            .unwrap_or(FALLBACK_SEARCH_TITLE);

        info!("Looking up metadata for \"{}\"", query);
        match self.metadata.lookup(query, is_tv, options.year).await {
            Some(found) => {
                info!(
                    "Metadata match: {}{}",
                    found.title,
                    found.year.map(|y| format!(" ({})", y)).unwrap_or_default()
                );
                found
            }
            None => {
                info!("No metadata found, naming files after \"{}\"", query);
                Metadata::local(query, is_tv, options.year)
            }
        }
    }

    async fn rip_selected(
        &self,
        options: &RipOptions,
        disc: &DiscInfo,
        selection: &SelectedTitle,
        work_dir: &Path,
        metadata: &Metadata,
        episodes: &[EpisodeInfo],
    ) -> Result<PathBuf> {
        let title_id = selection.title.id;
        let title_dir = work_dir.join(format!("title_{:02}", title_id));
        let started = Instant::now();

        self.rip_with_retry(&options.source, title_id, &title_dir, disc.disc_type)
            .await?;

        let ripped = largest_output(&title_dir)?;
        let episode_title = match selection.role {
            TitleRole::Episode { season, episode } => episode_name(episodes, season, episode),
            TitleRole::Feature { .. } => None,
        };
        let destination = unique_path(output_path(
            &options.output_dir,
            metadata,
            selection.role,
            episode_title,
        ));

        let size = get_file_size(&ripped)?;
        move_file(&ripped, &destination)?;

        log_rip_complete(title_id, started.elapsed(), size);
        log_output_named(&destination);
        Ok(destination)
    }

    async fn rip_with_retry(
        &self,
        source: &DiscSource,
        title_id: u32,
        title_dir: &Path,
        disc_type: DiscType,
    ) -> Result<()> {
        let ripping = &self.config.ripping;
        let max_attempts = ripping.max_attempts.max(1);
        let mut delay = Duration::from_secs(ripping.retry_delay_seconds);

        for attempt in 1..=max_attempts {
            reset_dir(title_dir)?;

            let failure = match self
                .ripper
                .rip_title(source, title_id, title_dir, disc_type)
                .await
            {
                Ok(0) => return Ok(()),
                Ok(code) => Error::rip(format!("makemkvcon exited with code {}", code)),
                Err(e) => e,
            };

            if attempt == max_attempts {
                return Err(failure);
            }

            warn!(
                "Attempt {}/{} for title {} failed ({}), retrying in {}s",
                attempt,
                max_attempts,
                title_id,
                failure,
                delay.as_secs()
            );
            tokio::time::sleep(delay).await;
            delay *= 2;
        }

        Err(Error::rip(format!("Title {} was never attempted", title_id)))
    }

    fn cleanup(&self, work_dir: &Path) {
        if self.config.ripping.keep_temp_files {
            info!("Keeping work directory {}", work_dir.display());
            return;
        }

        match std::fs::remove_dir_all(work_dir) {
            Ok(()) => debug!("Removed work directory {}", work_dir.display()),
            Err(e) => warn!(
                "Failed to remove work directory {}: {}",
                work_dir.display(),
                e
            ),
        }
    }
}

/// Empties `dir` so a retry never picks up a partial file.
fn reset_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)?;
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// makemkvcon writes one file per title; if there are several, the biggest wins.
fn largest_output(dir: &Path) -> Result<PathBuf> {
    let mut outputs = Vec::new();
    for path in find_rip_outputs(dir) {
        let size = get_file_size(&path)?;
        outputs.push((size, path));
    }

    if outputs.len() > 1 {
        debug!(
            "{} output files in {}, keeping the largest",
            outputs.len(),
            dir.display()
        );
    }

    outputs
        .into_iter()
        .max_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(&a.1)))
        .map(|(size, path)| {
            debug!("Ripped file {} ({})", path.display(), format_file_size(size));
            path
        })
        .ok_or_else(|| Error::rip(format!("No output file written to {}", dir.display())))
}
