//! Progress reporting for increment emission

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

/// Receives emission progress after every recorded increment
pub trait ProgressObserver {
    /// Report that `completed` of `total` increments have been recorded
    fn on_progress(&mut self, completed: u64, total: u64);
}

impl<F> ProgressObserver for F
where
    F: FnMut(u64, u64),
{
    fn on_progress(&mut self, completed: u64, total: u64) {
        self(completed, total);
    }
}

/// Observer that discards every update
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&mut self, _completed: u64, _total: u64) {}
}

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] {{msg}} [{{bar:{PROGRESS_BAR_WIDTH}.green/white}}] {{pos}}/{{len}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Terminal progress bar for a single emission run
pub struct ProgressReporter {
    bar: ProgressBar,
    last_percent: u64,
}

impl ProgressReporter {
    /// Create a bar sized for `total` increments
    pub fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(PROGRESS_STYLE.clone());
        bar.set_message("  0%");
        Self {
            bar,
            last_percent: 0,
        }
    }

    /// Create a reporter that never draws, for tests and non-interactive runs
    pub fn hidden(total: u64) -> Self {
        let reporter = Self::new(total);
        reporter.bar.set_draw_target(indicatif::ProgressDrawTarget::hidden());
        reporter
    }

    /// Position the bar has reached
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Close the bar, leaving the final state on screen
    pub fn finish(&self) {
        self.bar.finish_with_message("done");
    }
}

impl ProgressObserver for ProgressReporter {
    fn on_progress(&mut self, completed: u64, total: u64) {
        if self.bar.length() != Some(total) {
            self.bar.set_length(total);
        }
        self.bar.set_position(completed);

        // Only rewrite the message when the whole percentage changes
        let percent = completed.saturating_mul(100).checked_div(total).unwrap_or(100);
        if percent != self.last_percent {
            self.last_percent = percent;
            self.bar.set_message(format!("{percent:>3}%"));
        }
    }
}
