use crate::analysis::ContentKind;
use crate::disc::{DiscSource, DiscType};
use crate::utils::{Error, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// How the disc content type is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RipMode {
    /// Classify from title durations
    Auto,
    Movie,
    Tv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DiscTypeArg {
    /// Use what makemkvcon reports
    Auto,
    Dvd,
    Bluray,
    Uhd,
}

impl DiscTypeArg {
    pub fn as_override(&self) -> Option<DiscType> {
        match self {
            Self::Auto => None,
            Self::Dvd => Some(DiscType::Dvd),
            Self::Bluray => Some(DiscType::Bluray),
            Self::Uhd => Some(DiscType::Uhd),
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version)]
#[command(name = "autorip")]
#[command(about = "Rip DVD and Blu-ray discs with makemkvcon, detecting movies and TV series")]
#[command(long_about = "
Reads a disc with makemkvcon, decides from its title durations whether it holds a
movie or TV episodes, rips the relevant titles and names them for a media library.

EXAMPLES:
  # Detect the content type automatically
  autorip --output ~/Media

  # Force TV mode, second disc of season 2
  autorip --output ~/Media --tv --season 2 --episode-start 7

  # Rip from an ISO image with a known title
  autorip --disc ~/rips/heat.iso --output ~/Media --title \"Heat\" --year 1995

  # Only show what is on the disc
  autorip --scan
")]
pub struct CliArgs {
    /// Disc source: disc:N, dev:/dev/srN, iso:/path, file:/path, a drive index or a path
    #[arg(short, long, value_name = "SRC", default_value = "disc:0")]
    pub disc: String,

    /// Library root the named files are moved into
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Parent directory for the temporary work directory (overrides app.temp_dir)
    #[arg(long, value_name = "DIR")]
    pub temp: Option<PathBuf>,

    /// Treat the disc as a TV series (same as --mode tv)
    #[arg(long)]
    pub tv: bool,

    /// Content type: auto-detect, or force movie / tv
    #[arg(short, long, value_enum)]
    pub mode: Option<RipMode>,

    /// Title used for the metadata lookup instead of the disc label
    #[arg(short, long, value_name = "TITLE")]
    pub title: Option<String>,

    /// Release year used to narrow the metadata lookup
    #[arg(short, long, value_name = "YEAR")]
    pub year: Option<u16>,

    /// Season number for TV discs (defaults to the label hint, then 1)
    #[arg(short, long, value_name = "N")]
    pub season: Option<u32>,

    /// Number of the first episode on this disc
    #[arg(short, long, value_name = "N", default_value_t = 1)]
    pub episode_start: u32,

    /// Override the disc type reported by makemkvcon
    #[arg(long, value_enum, default_value = "auto")]
    pub disc_type: DiscTypeArg,

    /// Configuration file path
    #[arg(long, default_value = "config.yaml", value_name = "FILE")]
    pub config: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Print the disc's titles and classification, then exit
    #[arg(long)]
    pub scan: bool,

    /// Validate configuration file
    #[arg(long)]
    pub validate_config: bool,
}

impl CliArgs {
    pub fn get_log_level<'a>(&self, config_level: &'a str) -> &'a str {
        if self.debug {
            "debug"
        } else {
            config_level
        }
    }

    pub fn should_use_color(&self) -> bool {
        !self.no_color
    }

    pub fn is_info_command(&self) -> bool {
        self.scan || self.validate_config
    }

    /// The content type forced by `--tv` / `--mode`, or `None` for detection.
    pub fn forced_kind(&self) -> Option<ContentKind> {
        match self.resolved_mode() {
            RipMode::Auto => None,
            RipMode::Movie => Some(ContentKind::Movie),
            RipMode::Tv => Some(ContentKind::Series),
        }
    }

    pub fn resolved_mode(&self) -> RipMode {
        match (self.tv, self.mode) {
            (true, _) => RipMode::Tv,
            (false, Some(mode)) => mode,
            (false, None) => RipMode::Auto,
        }
    }

    pub fn disc_source(&self) -> Result<DiscSource> {
        DiscSource::parse(&self.disc)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tv && self.mode == Some(RipMode::Movie) {
            return Err(Error::validation(
                "--tv cannot be combined with --mode movie",
            ));
        }

        if self.episode_start == 0 {
            return Err(Error::validation("--episode-start must be at least 1"));
        }

        if self.season == Some(0) {
            return Err(Error::validation("--season must be at least 1"));
        }

        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(Error::validation("--title must not be empty"));
            }
        }

        if !self.validate_config {
            self.disc_source()?;
        }

        if !self.is_info_command() {
            match &self.output {
                None => {
                    return Err(Error::validation(
                        "--output is required unless --scan or --validate-config is given",
                    ))
                }
                Some(output) if output.exists() && !output.is_dir() => {
                    return Err(Error::validation(format!(
                        "Output path is not a directory: {}",
                        output.display()
                    )));
                }
                Some(_) => {}
            }
        }

        if let Some(temp) = &self.temp {
            if temp.exists() && !temp.is_dir() {
                return Err(Error::validation(format!(
                    "Temp path is not a directory: {}",
                    temp.display()
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("autorip").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["--output", "/tmp"]);
        assert_eq!(args.disc, "disc:0");
        assert_eq!(args.episode_start, 1);
        assert_eq!(args.season, None);
        assert_eq!(args.disc_type, DiscTypeArg::Auto);
        assert_eq!(args.resolved_mode(), RipMode::Auto);
        assert_eq!(args.forced_kind(), None);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_output_required_for_rips() {
        let args = parse(&[]);
        assert!(args.validate().is_err());

        assert!(parse(&["--scan"]).validate().is_ok());
        assert!(parse(&["--validate-config"]).validate().is_ok());
    }

    #[test]
    fn test_tv_flag_forces_series() {
        let args = parse(&["--output", "/tmp", "--tv"]);
        assert_eq!(args.resolved_mode(), RipMode::Tv);
        assert_eq!(args.forced_kind(), Some(ContentKind::Series));

        let args = parse(&["--output", "/tmp", "--tv", "--mode", "tv"]);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_tv_conflicts_with_movie_mode() {
        let args = parse(&["--output", "/tmp", "--tv", "--mode", "movie"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_mode_movie() {
        let args = parse(&["--output", "/tmp", "--mode", "movie"]);
        assert_eq!(args.forced_kind(), Some(ContentKind::Movie));
    }

    #[test]
    fn test_episode_start_must_be_positive() {
        let args = parse(&["--output", "/tmp", "--episode-start", "0"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_unknown_mode_rejected_by_parser() {
        let result =
            CliArgs::try_parse_from(["autorip", "--output", "/tmp", "--mode", "documentary"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_disc_type_override() {
        let args = parse(&["--scan", "--disc-type", "uhd"]);
        assert_eq!(args.disc_type.as_override(), Some(DiscType::Uhd));
        assert_eq!(DiscTypeArg::Auto.as_override(), None);
    }

    #[test]
    fn test_debug_overrides_config_level() {
        let args = parse(&["--scan", "--debug"]);
        assert_eq!(args.get_log_level("warn"), "debug");
        assert_eq!(parse(&["--scan"]).get_log_level("warn"), "warn");
    }
}
