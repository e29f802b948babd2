//! Simple logging helper functions for common operations

use crate::analysis::ContentClassification;
use crate::disc::{DiscInfo, TitleRecord};
use crate::utils::filesystem::format_file_size;
use std::path::Path;
use std::time::Duration;

/// Logs the titles found on a scanned disc
pub fn log_disc_scan(info: &DiscInfo) {
    tracing::info!(
        "Disc scan complete: {} title(s) on {} disc",
        info.titles.len(),
        info.disc_type
    );
    if let Some(label) = &info.label {
        tracing::info!("Volume label: {}", label);
    }
    for title in &info.titles {
        tracing::debug!("  {}", describe_title(title));
    }
}

/// Logs the result of content type detection
pub fn log_classification(classification: &ContentClassification) {
    tracing::info!(
        "{} CONTENT DETECTED (confidence {:.2}: {})",
        classification.kind.as_str().to_uppercase(),
        classification.confidence,
        classification.rule.description()
    );
}

pub fn log_rip_start(title: &TitleRecord, index: usize, total: usize) {
    tracing::info!(
        "Ripping title {} ({}) [{}/{}]",
        title.id,
        title.duration_display(),
        index,
        total
    );
}

pub fn log_rip_complete(title_id: u32, elapsed: Duration, output_size: u64) {
    tracing::info!(
        "Title {} ripped in {:.1}s, {}",
        title_id,
        elapsed.as_secs_f64(),
        format_file_size(output_size)
    );
}

pub fn log_output_named(path: &Path) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    tracing::info!("Saved {}", name);
}

/// One line per title, as used by logs and `--scan`.
pub fn describe_title(title: &TitleRecord) -> String {
    let mut line = format!("title {:>2}: {:>8}", title.id, title.duration_display());
    if let Some(chapters) = title.chapter_count {
        line.push_str(&format!(", {} chapter(s)", chapters));
    }
    if let Some(size) = title.size_bytes {
        line.push_str(&format!(", {}", format_file_size(size)));
    }
    if let Some(file_name) = &title.file_name {
        line.push_str(&format!(" [{}]", file_name));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ContentTypeDetector;

    #[test]
    fn test_describe_title() {
        let mut title = TitleRecord::new(3, 1361);
        assert_eq!(describe_title(&title), "title  3:  0:22:41");

        title.chapter_count = Some(6);
        title.size_bytes = Some(1024);
        title.file_name = Some("B1_t03.mkv".to_string());
        assert_eq!(
            describe_title(&title),
            "title  3:  0:22:41, 6 chapter(s), 1.00 KB [B1_t03.mkv]"
        );
    }

    // These only check that the helpers run without a subscriber installed
    #[test]
    fn test_log_helpers_run() {
        let info = DiscInfo::new(vec![TitleRecord::new(0, 7200), TitleRecord::new(1, 300)]);
        log_disc_scan(&info);
        log_classification(&ContentTypeDetector::new().detect(&info.titles));
        log_rip_start(&info.titles[0], 1, 1);
        log_rip_complete(0, Duration::from_secs(600), 30_000_000_000);
        log_output_named(Path::new("/media/Heat (1995)/Heat (1995).mkv"));
    }
}
