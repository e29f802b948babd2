//! Formatter module for custom log formatting

pub mod filters;
pub mod levels;
pub mod styling;

use chrono::Local;
use console::style;
use std::fmt::{self as std_fmt, Debug};
use tracing::Level;
use tracing_subscriber::fmt::{format::Writer, FmtContext, FormatEvent, FormatFields};

use crate::utils::logging::text_utils;
use filters::should_show_message;
use levels::{determine_processing_level, ProcessingLevel};
use styling::{format_level, get_tree_prefix, style_message};

pub struct CleanFormatter {
    show_timestamps: bool,
    use_color: bool,
}

impl CleanFormatter {
    pub fn new(show_timestamps: bool, use_color: bool) -> Self {
        Self {
            show_timestamps,
            use_color,
        }
    }

    fn format_message(&self, message: &str, metadata_level: &Level) -> String {
        let level = determine_processing_level(message);
        let prefix = get_tree_prefix(level);

        let level_indicator = format_level(metadata_level, self.use_color);
        let level_indicator_width = if level_indicator.is_empty() {
            0
        } else {
            level_indicator.len() + 2
        }; // +2 for spaces around it

        // Timestamp: "[HH:MM:SS] " = 11 chars
        // Prefix: "▶ ", "● ", or "  " = 2 chars
        let timestamp_width = if self.show_timestamps { 11 } else { 0 };
        let prefix_width = 2;
        let available_width = 140usize
            .saturating_sub(timestamp_width + prefix_width + level_indicator_width + 4); // 4 chars buffer

        let formatted_content = match level {
            ProcessingLevel::Stage => {
                let clean_message = if message.contains("CONTENT DETECTED") {
                    message.replace(" CONTENT DETECTED", " content detected")
                } else {
                    message.to_string()
                };
                style_message(&clean_message, level, self.use_color)
            }
            ProcessingLevel::Step => {
                let clean_message = if message.starts_with("Disc scan complete") {
                    summarize_scan(message).unwrap_or_else(|| message.to_string())
                } else {
                    message.to_string()
                };
                style_message(&clean_message, level, self.use_color)
            }
            _ => style_message(message, level, self.use_color),
        };

        let wrapped_content = text_utils::wrap_text(&formatted_content, available_width);

        let level_prefix = if !level_indicator.is_empty() {
            format!("{} ", level_indicator)
        } else {
            String::new()
        };

        if wrapped_content.contains('\n') {
            let lines: Vec<&str> = wrapped_content.lines().collect();
            let first_line = format!("{} {}{}", prefix, level_prefix, lines[0]);

            // Continuation lines line up under the message text
            let continuation_indent =
                " ".repeat(timestamp_width + prefix_width + level_indicator_width);
            let continuation_lines: Vec<String> = lines[1..]
                .iter()
                .map(|line| format!("{}{}", continuation_indent, line))
                .collect();

            if continuation_lines.is_empty() {
                first_line
            } else {
                format!("{}\n{}", first_line, continuation_lines.join("\n"))
            }
        } else {
            format!("{} {}{}", prefix, level_prefix, wrapped_content)
        }
    }
}

impl<S, N> FormatEvent<S, N> for CleanFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std_fmt::Result {
        let metadata = event.metadata();
        let message = {
            let mut visitor = MessageVisitor::default();
            event.record(&mut visitor);
            visitor.message
        };

        if !should_show_message(&message) {
            return Ok(());
        }

        let mut output = String::new();

        if self.show_timestamps {
            let now = Local::now();
            let timestamp = if self.use_color {
                style(now.format("%H:%M:%S").to_string())
                    .dim()
                    .to_string()
            } else {
                now.format("%H:%M:%S").to_string()
            };
            output.push_str(&format!("[{}] ", timestamp));
        }

        output.push_str(&self.format_message(&message, metadata.level()));

        writeln!(writer, "{}", output)
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value).trim_matches('"').to_string();
        }
    }
}

/// Shortens "Disc scan complete: 12 title(s) on bluray disc" to "Disc: 12 title(s), bluray"
fn summarize_scan(message: &str) -> Option<String> {
    let summary = message.split_once(": ")?.1;
    let (titles, disc) = summary.split_once(" on ")?;
    Some(format!("Disc: {}, {}", titles, disc.trim_end_matches(" disc")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_scan() {
        let msg = "Disc scan complete: 12 title(s) on bluray disc";
        assert_eq!(
            summarize_scan(msg).as_deref(),
            Some("Disc: 12 title(s), bluray")
        );
    }

    #[test]
    fn test_summarize_scan_unexpected_format() {
        assert!(summarize_scan("Disc scan complete").is_none());
    }

    #[test]
    fn test_content_detected_is_softened() {
        let formatter = CleanFormatter::new(false, false);
        let line = formatter.format_message("MOVIE CONTENT DETECTED (confidence 0.95)", &Level::INFO);
        assert!(line.contains("MOVIE content detected"));
        assert!(line.starts_with('●'));
    }
}
