//! Message filtering to remove noisy log output

/// Checks if a message should be shown based on noise patterns
/// Returns true if the message should be displayed, false if it should be filtered out
pub fn should_show_message(message: &str) -> bool {
    // makemkvcon chatter that is repeated on every invocation
    let noise_patterns = [
        "makemkvcon: MakeMKV v",
        "makemkvcon: Using direct disc access mode",
        "makemkvcon: Loaded content hash table",
        "makemkvcon: Evaluation version",
        "makemkvcon: The new version",
        "makemkvcon: Debug logging enabled",
        "makemkvcon: LIBMKV_TRACE",
        "hyper::",
        "reqwest::connect",
    ];

    !noise_patterns
        .iter()
        .any(|pattern| message.contains(pattern))
}
