/// Processing level determination for hierarchical log output

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingLevel {
    Root,   // Top level operations
    Stage,  // Major processing stages
    Step,   // Individual steps within stages
    Detail, // Detailed information
}

/// Determines the processing level of a log message based on its content
pub fn determine_processing_level(message: &str) -> ProcessingLevel {
    // Root level - one disc run
    if message.starts_with("Processing disc") {
        return ProcessingLevel::Root;
    }

    // Classification outcome and overrides
    if message.contains("CONTENT DETECTED")
        || message.contains("Content type forced")
        || message.contains("Content type chosen")
    {
        return ProcessingLevel::Stage;
    }

    // Start and end of the rip phase
    if (message.starts_with("Starting") && message.contains("rip"))
        || message.starts_with("Ripping complete")
    {
        return ProcessingLevel::Stage;
    }

    // Disc scanning
    if message.starts_with("Scanning disc") || message.starts_with("Disc scan complete") {
        return ProcessingLevel::Step;
    }

    // Metadata lookups
    if message.starts_with("Looking up metadata")
        || message.starts_with("Metadata match")
        || message.starts_with("No metadata found")
    {
        return ProcessingLevel::Step;
    }

    // Per-title work
    if (message.starts_with("Ripping title") && !message.contains("  "))
        || message.starts_with("Saved")
    {
        return ProcessingLevel::Step;
    }

    // Detail level - supporting information
    ProcessingLevel::Detail
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_level() {
        assert_eq!(
            determine_processing_level("Processing disc disc:0"),
            ProcessingLevel::Root
        );
    }

    #[test]
    fn test_stage_level() {
        assert_eq!(
            determine_processing_level("SERIES CONTENT DETECTED (confidence 0.92)"),
            ProcessingLevel::Stage
        );
        assert_eq!(
            determine_processing_level("Content type forced to movie by --mode"),
            ProcessingLevel::Stage
        );
        assert_eq!(
            determine_processing_level("Starting rip of 4 title(s)"),
            ProcessingLevel::Stage
        );
        assert_eq!(
            determine_processing_level("Ripping complete: 4 succeeded, 0 failed"),
            ProcessingLevel::Stage
        );
    }

    #[test]
    fn test_step_level() {
        assert_eq!(
            determine_processing_level("Scanning disc disc:0"),
            ProcessingLevel::Step
        );
        assert_eq!(
            determine_processing_level("Metadata match: Heat (1995)"),
            ProcessingLevel::Step
        );
        assert_eq!(
            determine_processing_level("Ripping title 3 (0:22:41)"),
            ProcessingLevel::Step
        );
        assert_eq!(
            determine_processing_level("Saved Heat (1995).mkv"),
            ProcessingLevel::Step
        );
    }

    #[test]
    fn test_detail_level() {
        assert_eq!(
            determine_processing_level("Some detail information"),
            ProcessingLevel::Detail
        );
        assert_eq!(
            determine_processing_level("Duration buckets: 0 short"),
            ProcessingLevel::Detail
        );
    }
}
