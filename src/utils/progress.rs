use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

/// Progress bar fed from makemkvcon `PRGV` records.
pub struct RipProgress {
    progress_bar: ProgressBar,
    start_time: Instant,
}

impl RipProgress {
    const PRECISION: u64 = 10000; // 0.01% steps

    pub fn new(visible: bool) -> Self {
        let progress_bar = if visible {
            ProgressBar::new(Self::PRECISION)
        } else {
            ProgressBar::hidden()
        };

        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {percent:>3}% | {msg}",
        ) {
            progress_bar.set_style(style.progress_chars("█▉▊▋▌▍▎▏ "));
        }
        progress_bar.enable_steady_tick(Duration::from_millis(250));

        Self {
            progress_bar,
            start_time: Instant::now(),
        }
    }

    pub fn set_message(&self, message: &str) {
        self.progress_bar.set_message(message.to_string());
    }

    /// `value` out of `max`, as reported by makemkvcon.
    pub fn update(&self, value: u64, max: u64) {
        self.progress_bar.set_position(scaled_position(value, max));
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn finish(&self) {
        self.progress_bar.finish_and_clear();
    }
}

fn scaled_position(value: u64, max: u64) -> u64 {
    if max == 0 {
        return 0;
    }
    ((value.min(max) as f64 / max as f64) * RipProgress::PRECISION as f64) as u64
}
