//! Text wrapping utilities for log formatting

/// Wraps text to `max_width`, keeping the leading indentation of each line
/// on its continuation lines (title listings are indented).
pub fn wrap_text(text: &str, max_width: usize) -> String {
    let mut wrapped_lines = Vec::new();

    for line in text.lines() {
        if line.chars().count() <= max_width {
            wrapped_lines.push(line.to_string());
            continue;
        }

        let content = line.trim_start();
        let indent = &line[..line.len() - content.len()];
        let mut current_line = String::from(indent);

        for word in content.split_whitespace() {
            let needs_space = current_line.len() > indent.len();
            let candidate_len =
                current_line.chars().count() + word.chars().count() + usize::from(needs_space);

            if needs_space && candidate_len > max_width {
                wrapped_lines.push(std::mem::replace(&mut current_line, indent.to_string()));
            } else if needs_space {
                current_line.push(' ');
            }
            current_line.push_str(word);
        }

        if current_line.len() > indent.len() {
            wrapped_lines.push(current_line);
        }
    }

    wrapped_lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_short_text() {
        assert_eq!(wrap_text("Short text", 80), "Short text");
    }

    #[test]
    fn test_wrap_long_text() {
        let text = "Selected 6 titles as episodes of season 2 starting at episode 7 after dropping one play-all title";
        let result = wrap_text(text, 40);
        assert!(result.contains('\n'));
        for line in result.lines() {
            assert!(line.chars().count() <= 40);
        }
    }

    #[test]
    fn test_wrap_keeps_indent() {
        let text = "    title 3: 0:22:41, 6 chapters, very long description that does not fit on one line";
        let result = wrap_text(text, 40);
        assert!(result.lines().count() > 1);
        assert!(result.lines().all(|line| line.starts_with("    ")));
    }

    #[test]
    fn test_wrap_multiline() {
        let text = "Line one\nLine two that is very long and should be wrapped to fit within the maximum width";
        let lines: Vec<String> = wrap_text(text, 40).lines().map(String::from).collect();
        assert!(lines.len() > 2);
        assert_eq!(lines[0], "Line one");
    }
}
