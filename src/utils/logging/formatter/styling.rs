//! Styling and formatting for log messages

use console::style;
use tracing::Level;

use super::levels::ProcessingLevel;

/// Formats a log level with appropriate styling
pub fn format_level(level: &Level, use_color: bool) -> String {
    let (text, styled) = match *level {
        Level::ERROR => ("ERROR", style("ERROR").red().bold()),
        Level::WARN => ("WARN ", style("WARN ").yellow()),
        Level::INFO => return String::new(), // INFO is the default, no prefix
        Level::DEBUG => ("DEBUG", style("DEBUG").blue()),
        Level::TRACE => ("TRACE", style("TRACE").magenta()),
    };

    if use_color {
        styled.to_string()
    } else {
        text.to_string()
    }
}

/// Gets the tree prefix symbol for a given processing level
pub fn get_tree_prefix(level: ProcessingLevel) -> &'static str {
    match level {
        ProcessingLevel::Root => "▶",
        ProcessingLevel::Stage => "●",
        ProcessingLevel::Step | ProcessingLevel::Detail => " ",
    }
}

/// Applies styling to message content based on processing level
pub fn style_message(message: &str, level: ProcessingLevel, use_color: bool) -> String {
    if !use_color {
        return match level {
            ProcessingLevel::Root => message.to_uppercase(),
            _ => message.to_string(),
        };
    }

    match level {
        ProcessingLevel::Root => style(message).bold().cyan().to_string(),
        ProcessingLevel::Stage => style(message).bold().green().to_string(),
        ProcessingLevel::Step if message.starts_with("Saved") => {
            style(message).green().to_string()
        }
        ProcessingLevel::Step => style(message).cyan().to_string(),
        ProcessingLevel::Detail => style(message).dim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_level_no_color() {
        assert_eq!(format_level(&Level::ERROR, false), "ERROR");
        assert_eq!(format_level(&Level::WARN, false), "WARN ");
        assert_eq!(format_level(&Level::INFO, false), "");
        assert_eq!(format_level(&Level::DEBUG, false), "DEBUG");
    }

    #[test]
    fn test_format_level_with_color() {
        assert!(format_level(&Level::ERROR, true).contains("ERROR"));
        assert_eq!(format_level(&Level::INFO, true), "");
    }

    #[test]
    fn test_get_tree_prefix() {
        assert_eq!(get_tree_prefix(ProcessingLevel::Root), "▶");
        assert_eq!(get_tree_prefix(ProcessingLevel::Stage), "●");
        assert_eq!(get_tree_prefix(ProcessingLevel::Step), " ");
        assert_eq!(get_tree_prefix(ProcessingLevel::Detail), " ");
    }

    #[test]
    fn test_style_message_no_color() {
        let msg = "Processing disc disc:0";
        assert_eq!(
            style_message(msg, ProcessingLevel::Root, false),
            "PROCESSING DISC DISC:0"
        );
        assert_eq!(style_message(msg, ProcessingLevel::Stage, false), msg);
        assert_eq!(style_message(msg, ProcessingLevel::Detail, false), msg);
    }

    #[test]
    fn test_style_message_with_color() {
        let msg = "Saved Heat (1995).mkv";
        assert!(style_message(msg, ProcessingLevel::Step, true).contains(msg));
        assert!(style_message(msg, ProcessingLevel::Stage, true).contains(msg));
    }
}
