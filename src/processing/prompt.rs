use crate::analysis::{ContentClassification, ContentKind};
use console::{style, Term};
use std::io::IsTerminal;
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::debug;

const MAX_PROMPT_ATTEMPTS: usize = 3;

/// Asks somebody to settle a classification the detector was unsure about.
///
/// `ask` is synchronous and may block on user input while the rip workflow
/// is running on the async runtime.
pub trait ContentPrompt: Send + Sync {
    /// `None` when nobody can answer; the caller then falls back to config.
    fn ask(&self, classification: &ContentClassification) -> Option<ContentKind>;
}

/// Prompts on the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl ContentPrompt for TerminalPrompt {
    fn ask(&self, classification: &ContentClassification) -> Option<ContentKind> {
        let term = Term::stderr();
        if !term.is_term() || !std::io::stdin().is_terminal() {
            debug!("No interactive terminal, not prompting for content type");
            return None;
        }

        let suggestion = classification.kind.is_determined().then_some(classification.kind);
        let default_hint = match suggestion {
            Some(ContentKind::Movie) => " [M/t]",
            Some(ContentKind::Series) => " [m/T]",
            _ => " [m/t]",
        };

        let _ = term.write_line(&format!(
            "{} detection is unsure: {} (confidence {:.2}, {})",
            style("?").yellow().bold(),
            classification.kind,
            classification.confidence,
            classification.rule.description()
        ));

        for _ in 0..MAX_PROMPT_ATTEMPTS {
            let _ = term.write_str(&format!("Rip as movie or TV series?{} ", default_hint));
            let line = blocking(|| term.read_line()).ok()?;
            match parse_answer(&line) {
                Some(kind) => return Some(kind),
                None if line.trim().is_empty() && suggestion.is_some() => return suggestion,
                None => {
                    let _ = term.write_line("Please answer 'm' (movie) or 't' (TV series).");
                }
            }
        }
        None
    }
}

/// Runs a blocking call without stalling other tasks on a multi-threaded
/// runtime. On a current-thread runtime, or outside one, it just runs inline.
fn blocking<T>(f: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}

/// Never answers; used for unattended runs and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrompt;

impl ContentPrompt for NoPrompt {
    fn ask(&self, _classification: &ContentClassification) -> Option<ContentKind> {
        None
    }
}

pub fn parse_answer(answer: &str) -> Option<ContentKind> {
    match answer.trim().to_lowercase().as_str() {
        "m" | "movie" | "film" => Some(ContentKind::Movie),
        "t" | "tv" | "s" | "series" | "show" => Some(ContentKind::Series),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("m"), Some(ContentKind::Movie));
        assert_eq!(parse_answer(" Movie \n"), Some(ContentKind::Movie));
        assert_eq!(parse_answer("T"), Some(ContentKind::Series));
        assert_eq!(parse_answer("series"), Some(ContentKind::Series));
        assert_eq!(parse_answer(""), None);
        assert_eq!(parse_answer("maybe"), None);
    }

    #[test]
    fn test_blocking_outside_runtime() {
        assert_eq!(blocking(|| 7), 7);
    }

    #[tokio::test]
    async fn test_blocking_on_current_thread_runtime() {
        assert_eq!(blocking(|| "inline"), "inline");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_blocking_on_multi_thread_runtime() {
        let handle = tokio::spawn(async { blocking(|| 40 + 2) });
        assert_eq!(handle.await.unwrap(), 42);
    }
}
