//! Terminal progress bar for long computations.

use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;

use crate::progress::ProgressSink;

/// Forwards engine progress to an `indicatif` bar on stderr.
#[derive(Debug)]
pub struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    /// A bar over `0..=100`, or `None` when quiet or stderr is not a terminal.
    pub fn new(quiet: bool) -> Option<Self> {
        if quiet || !std::io::stderr().is_terminal() {
            return None;
        }
        let bar = ProgressBar::new(100);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")
        {
            bar.set_style(style.progress_chars("#>-"));
        }
        Some(Self { bar })
    }

    /// Remove the bar.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for TerminalProgress {
    fn update(&self, percent: u8, message: Option<&str>) {
        self.bar.set_position(u64::from(percent));
        if let Some(m) = message {
            self.bar.set_message(m.to_string());
        }
    }
}
