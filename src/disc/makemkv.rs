//! makemkvcon integration.
//!
//! Both disc scanning and ripping go through makemkvcon's robot mode (`-r`),
//! which prints one record per line, e.g.
//!
//! ```text
//! CINFO:2,0,"THE_MATRIX"
//! TCOUNT:2
//! TINFO:0,9,0,"2:16:18"
//! PRGV:1024,2048,65536
//! ```

use super::{DiscInfo, DiscReader, DiscSource, DiscType, RipExecutor, TitleRecord};
use crate::config::ToolsConfig;
use crate::utils::progress::RipProgress;
use crate::utils::{Error, Result, ToolRunner};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

// CINFO attribute ids
const ATTR_TYPE: u32 = 1;
const ATTR_NAME: u32 = 2;
const ATTR_VOLUME_NAME: u32 = 32;
// TINFO attribute ids
const ATTR_CHAPTER_COUNT: u32 = 8;
const ATTR_DURATION: u32 = 9;
const ATTR_SIZE_BYTES: u32 = 11;
const ATTR_OUTPUT_FILE_NAME: u32 = 27;

/// One parsed robot-mode line.
#[derive(Debug, Clone, PartialEq)]
pub enum RobotRecord {
    DiscInfo { attr: u32, value: String },
    TitleCount(u32),
    TitleInfo { title: u32, attr: u32, value: String },
    Progress { current: u64, total: u64, max: u64 },
    ProgressTitle(String),
    Message(String),
    Other,
}

impl RobotRecord {
    pub fn parse(line: &str) -> Option<Self> {
        let (kind, rest) = line.trim_end().split_once(':')?;
        let fields = split_fields(rest);
        let num = |i: usize| fields.get(i).and_then(|f| f.parse::<u64>().ok());

        let record = match kind {
            "CINFO" => Self::DiscInfo {
                attr: num(0)? as u32,
                value: fields.get(2)?.clone(),
            },
            "TCOUNT" => Self::TitleCount(num(0)? as u32),
            "TINFO" => Self::TitleInfo {
                title: num(0)? as u32,
                attr: num(1)? as u32,
                value: fields.get(3)?.clone(),
            },
            "PRGV" => Self::Progress {
                current: num(0)?,
                total: num(1)?,
                max: num(2)?,
            },
            "PRGT" | "PRGC" => Self::ProgressTitle(fields.get(2)?.clone()),
            "MSG" => Self::Message(fields.get(3)?.clone()),
            _ => Self::Other,
        };
        Some(record)
    }
}

/// Splits a comma separated robot record, honouring double quotes and `\"`.
fn split_fields(input: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Parses `h:mm:ss` (or `mm:ss`) into seconds.
pub fn parse_duration(value: &str) -> Option<u64> {
    value
        .trim()
        .split(':')
        .try_fold(0u64, |acc, part| Some(acc * 60 + part.parse::<u64>().ok()?))
}

/// Builds a [`DiscInfo`] from the complete output of `makemkvcon -r info`.
pub fn parse_info_output(output: &str) -> Result<DiscInfo> {
    let mut disc_type = DiscType::Unknown;
    let mut name = None;
    let mut volume_name = None;
    let mut title_count = None;
    let mut saw_disc_record = false;
    let mut titles: BTreeMap<u32, TitleRecord> = BTreeMap::new();

    for record in output.lines().filter_map(RobotRecord::parse) {
        match record {
            RobotRecord::DiscInfo { attr, value } => {
                saw_disc_record = true;
                match attr {
                    ATTR_TYPE => disc_type = DiscType::from_makemkv(&value),
                    ATTR_NAME if !value.is_empty() => name = Some(value),
                    ATTR_VOLUME_NAME if !value.is_empty() => volume_name = Some(value),
                    _ => {}
                }
            }
            RobotRecord::TitleCount(count) => title_count = Some(count),
            RobotRecord::TitleInfo { title, attr, value } => {
                let entry = titles
                    .entry(title)
                    .or_insert_with(|| TitleRecord::new(title, 0));
                match attr {
                    ATTR_DURATION => {
                        entry.duration_seconds = parse_duration(&value).ok_or_else(|| {
                            Error::parse(format!("Invalid duration for title {}: {}", title, value))
                        })?
                    }
                    ATTR_CHAPTER_COUNT => entry.chapter_count = value.parse().ok(),
                    ATTR_SIZE_BYTES => entry.size_bytes = value.parse().ok(),
                    ATTR_OUTPUT_FILE_NAME => entry.file_name = Some(value),
                    _ => {}
                }
            }
            RobotRecord::Message(message) => debug!("makemkvcon: {}", message),
            _ => {}
        }
    }

    if !saw_disc_record && title_count.is_none() {
        return Err(Error::disc_read(
            "makemkvcon reported no disc information (is a disc inserted?)",
        ));
    }

    if let Some(count) = title_count {
        if count as usize != titles.len() {
            warn!(
                "makemkvcon announced {} title(s) but described {}",
                count,
                titles.len()
            );
        }
    }

    Ok(DiscInfo {
        label: name.or(volume_name),
        disc_type,
        titles: titles.into_values().collect(),
    })
}

pub struct MakeMkv {
    runner: ToolRunner,
    min_title_seconds: u64,
    show_progress: bool,
}

impl MakeMkv {
    pub fn new(config: &ToolsConfig, min_title_seconds: u64, show_progress: bool) -> Self {
        Self {
            runner: ToolRunner::new(config.makemkvcon.clone(), config.timeout_seconds),
            min_title_seconds,
            show_progress,
        }
    }

    pub async fn check_availability(&self) -> Result<()> {
        self.runner.check_availability("--version").await
    }

    fn min_length_arg(&self) -> String {
        format!("--minlength={}", self.min_title_seconds)
    }
}

#[async_trait]
impl DiscReader for MakeMkv {
    async fn read_disc(&self, source: &DiscSource) -> Result<DiscInfo> {
        debug!("Running makemkvcon info on {}", source);

        let args = vec![
            "-r".to_string(),
            "--cache=1".to_string(),
            self.min_length_arg(),
            "info".to_string(),
            source.to_string(),
        ];

        let output = self
            .runner
            .run_unchecked(&args, self.runner.timeout())
            .await?;

        // makemkvcon returns non-zero for some readable discs, so judge by output
        let disc = parse_info_output(&output.stdout).map_err(|e| {
            if output.success() {
                e
            } else {
                Error::disc_read(format!(
                    "makemkvcon info exited with code {}: {}",
                    output.exit_code, e
                ))
            }
        })?;

        debug!(
            "makemkvcon reported {} title(s) longer than {}s",
            disc.titles.len(),
            self.min_title_seconds
        );
        Ok(disc)
    }
}

#[async_trait]
impl RipExecutor for MakeMkv {
    async fn rip_title(
        &self,
        source: &DiscSource,
        title_id: u32,
        dest_dir: &Path,
        disc_type: DiscType,
    ) -> Result<i32> {
        let args = vec![
            "-r".to_string(),
            "--progress=-same".to_string(),
            self.min_length_arg(),
            "mkv".to_string(),
            source.to_string(),
            title_id.to_string(),
            dest_dir.to_string_lossy().to_string(),
        ];

        let timeout = Duration::from_secs(
            self.runner.timeout().as_secs() * disc_type.timeout_multiplier(),
        );
        let progress = RipProgress::new(self.show_progress);
        progress.set_message(&format!("Ripping title {}", title_id));

        let exit_code = self
            .runner
            .run_streaming(&args, timeout, |line| match RobotRecord::parse(line) {
                Some(RobotRecord::Progress { total, max, .. }) => progress.update(total, max),
                Some(RobotRecord::ProgressTitle(task)) => progress.set_message(&task),
                Some(RobotRecord::Message(message)) => debug!("makemkvcon: {}", message),
                _ => {}
            })
            .await;

        progress.finish();
        let exit_code = exit_code?;

        if exit_code != 0 {
            warn!("makemkvcon exited with code {} for title {}", exit_code, title_id);
        }
        Ok(exit_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE_INFO: &str = r#"MSG:1005,0,1,"MakeMKV v1.17.5 linux(x64-release) started","%1 started","MakeMKV v1.17.5 linux(x64-release)"
DRV:0,2,999,1,"BD-RE HL-DT-ST","FRIENDS_S2_D1","/dev/sr0"
TCOUNT:3
CINFO:1,6209,"Blu-ray disc"
CINFO:2,0,"FRIENDS_S2_D1"
CINFO:32,0,"FRIENDS_S2_D1"
TINFO:0,2,0,"Friends"
TINFO:0,8,0,"6"
TINFO:0,9,0,"0:22:41"
TINFO:0,11,0,"1468006400"
TINFO:0,27,0,"Friends_t00.mkv"
TINFO:1,9,0,"0:22:39"
TINFO:1,27,0,"Friends_t01.mkv"
TINFO:2,9,0,"0:22:45"
TINFO:2,27,0,"Friends_t02.mkv"
"#;

    #[test]
    fn test_parse_info_output() {
        let disc = parse_info_output(SAMPLE_INFO).unwrap();
        assert_eq!(disc.label.as_deref(), Some("FRIENDS_S2_D1"));
        assert_eq!(disc.disc_type, DiscType::Bluray);
        assert_eq!(disc.titles.len(), 3);

        let first = &disc.titles[0];
        assert_eq!(first.duration_seconds, 22 * 60 + 41);
        assert_eq!(first.chapter_count, Some(6));
        assert_eq!(first.size_bytes, Some(1_468_006_400));
        assert_eq!(first.file_name.as_deref(), Some("Friends_t00.mkv"));
    }

    #[test]
    fn test_parse_info_output_without_disc() {
        let output = r#"MSG:5010,0,0,"Failed to open disc","Failed to open disc""#;
        assert!(matches!(
            parse_info_output(output),
            Err(Error::DiscRead { .. })
        ));
    }

    #[test]
    fn test_parse_info_output_with_no_titles() {
        let disc = parse_info_output("TCOUNT:0\nCINFO:1,6206,\"DVD disc\"\n").unwrap();
        assert!(disc.titles.is_empty());
        assert_eq!(disc.disc_type, DiscType::Dvd);
    }

    #[test]
    fn test_invalid_duration_is_an_error() {
        let output = "TCOUNT:1\nTINFO:0,9,0,\"about an hour\"\n";
        assert!(parse_info_output(output).is_err());
    }

    #[test]
    fn test_robot_record_parsing() {
        assert_eq!(
            RobotRecord::parse("PRGV:100,200,65536"),
            Some(RobotRecord::Progress {
                current: 100,
                total: 200,
                max: 65536
            })
        );
        assert_eq!(
            RobotRecord::parse("PRGT:5018,0,\"Saving to MKV file\""),
            Some(RobotRecord::ProgressTitle("Saving to MKV file".to_string()))
        );
        assert_eq!(RobotRecord::parse("DRV:0,256,999,0,\"\",\"\",\"\""), Some(RobotRecord::Other));
        assert_eq!(RobotRecord::parse("garbage"), None);
    }

    #[test]
    fn test_split_fields_with_quotes() {
        assert_eq!(
            split_fields(r#"0,2,0,"Title, with comma \"quoted\"""#),
            vec!["0", "2", "0", "Title, with comma \"quoted\""]
        );
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("2:16:18"), Some(8178));
        assert_eq!(parse_duration("45:00"), Some(2700));
        assert_eq!(parse_duration("1:xx:00"), None);
    }
}
