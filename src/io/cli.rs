//! Command-line interface wiring image, history, synthesis and ledger together

use crate::calendar::grid::{CountKind, GridState};
use crate::calendar::history::{CalendarDataFile, HistorySource, build_grid};
use crate::io::configuration::{
    DEBUG_LOG_FILTER, DEFAULT_AUTHOR_EMAIL, DEFAULT_AUTHOR_NAME, DEFAULT_COMMIT_HOUR,
    DEFAULT_LOG_FILTER,
};
use crate::io::error::Result;
use crate::io::image::{ImageFile, ImageSource, export_calendar_png};
use crate::io::ledger::{CommitIdentity, CountingSink, GitLedger, LedgerSink};
use crate::io::progress::{NoProgress, ProgressReporter};
use crate::io::render::{ascii_image, count_table};
use crate::synthesis::assign::assign_targets;
use crate::synthesis::emission::{EmissionReport, emit};
use crate::synthesis::quantize::quantize;
use crate::synthesis::scale::{ScaleResolution, resolve_scale};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "contribsynth")]
#[command(
    author,
    version,
    about = "Synthesize contribution calendar activity that renders an image"
)]
/// Command-line arguments for calendar synthesis
pub struct Cli {
    /// Target image, resampled to the 54x7 calendar
    #[arg(short, long, value_name = "IMAGE")]
    pub image: PathBuf,

    /// Saved contributions calendar data: a JSON array of [date, count] pairs
    #[arg(short = 'H', long, value_name = "HISTORY")]
    pub history: PathBuf,

    /// Directory for the git ledger (omit to simulate without committing)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Write a PNG preview of the target calendar
    #[arg(short, long, value_name = "PNG")]
    pub preview: Option<PathBuf>,

    /// Hour of day (UTC) stamped on ledger commits
    #[arg(short, long, default_value_t = DEFAULT_COMMIT_HOUR,
          value_parser = clap::value_parser!(u32).range(0..24))]
    pub commit_hour: u32,

    /// Author and committer name for ledger commits
    #[arg(long, value_name = "NAME", default_value = DEFAULT_AUTHOR_NAME)]
    pub author_name: String,

    /// Author and committer email for ledger commits
    #[arg(long, value_name = "EMAIL", default_value = DEFAULT_AUTHOR_EMAIL)]
    pub author_email: String,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Log scale, targets and calendar previews
    #[arg(short, long)]
    pub debug: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Check if commits are simulated instead of written
    pub const fn is_dry_run(&self) -> bool {
        self.output_dir.is_none()
    }

    /// Identity stamped on ledger commits
    pub fn commit_identity(&self) -> CommitIdentity {
        CommitIdentity::new(self.author_name.as_str(), self.author_email.as_str())
    }

    /// Log filter to install, honoring `RUST_LOG` unless debug output was requested
    pub fn log_filter(&self) -> EnvFilter {
        if self.debug {
            EnvFilter::new(DEBUG_LOG_FILTER)
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
        }
    }
}

/// Install the stderr log subscriber; later calls are ignored
pub fn init_logging(filter: EnvFilter) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Outcome of a synthesis run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Scale the targets were computed with
    pub resolution: ScaleResolution,
    /// Cell pinned to the top of the darkest bin
    pub anchor: Option<[usize; 2]>,
    /// Emission totals
    pub report: EmissionReport,
    /// Whether events were only counted rather than committed
    pub simulated: bool,
}

/// Runs the full pipeline for one set of CLI arguments
pub struct Synthesizer {
    cli: Cli,
}

impl Synthesizer {
    /// Create a synthesizer for the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Load the image and history named on the command line and synthesize
    ///
    /// # Errors
    ///
    /// Returns an error if either input cannot be loaded or synthesis fails
    pub fn process(&self) -> Result<RunSummary> {
        let image = ImageFile::new(&self.cli.image);
        let history = CalendarDataFile::new(&self.cli.history);
        self.synthesize(&image, &history)
    }

    /// Quantize the image, place the history, assign targets and emit increments
    ///
    /// # Errors
    ///
    /// Returns an error if the image is not calendar-shaped, the history is
    /// malformed, the preview cannot be written, or the ledger rejects an event
    pub fn synthesize<I, H>(&self, image: &I, history: &H) -> Result<RunSummary>
    where
        I: ImageSource + ?Sized,
        H: HistorySource + ?Sized,
    {
        let levels = quantize(&image.samples()?)?;
        let records = history.records()?;
        let mut grid = build_grid(&records)?;

        let resolution = resolve_scale(&grid, &levels);
        let assignment = assign_targets(&mut grid, &levels, resolution)?;
        tracing::info!(
            active_cells = grid.active_count(),
            scale = resolution.scale,
            increments = assignment.total_increments,
            "calendar targets ready"
        );
        Self::log_calendar(&grid, &resolution);

        if let Some(preview) = &self.cli.preview {
            export_calendar_png(&grid, &resolution, CountKind::Target, preview)?;
        }

        let report = if let Some(directory) = &self.cli.output_dir {
            let mut ledger = GitLedger::init(directory, &grid, resolution, self.cli.commit_hour)?
                .with_identity(self.cli.commit_identity());
            self.emit_with_progress(&mut grid, &mut ledger)?
        } else {
            tracing::warn!("no output directory given for git ledger; simulating result");
            let mut sink = CountingSink::default();
            self.emit_with_progress(&mut grid, &mut sink)?
        };

        Ok(RunSummary {
            resolution,
            anchor: assignment.anchor,
            report,
            simulated: self.cli.is_dry_run(),
        })
    }

    fn emit_with_progress<S: LedgerSink>(
        &self,
        grid: &mut GridState,
        sink: &mut S,
    ) -> Result<EmissionReport> {
        if self.cli.should_show_progress() {
            let mut reporter = ProgressReporter::new(grid.total_increments());
            let report = emit(grid, sink, &mut reporter);
            reporter.finish();
            report
        } else {
            emit(grid, sink, &mut NoProgress)
        }
    }

    fn log_calendar(grid: &GridState, resolution: &ScaleResolution) {
        if !tracing::enabled!(tracing::Level::DEBUG) {
            return;
        }
        tracing::debug!(
            "target calendar:\n{}",
            ascii_image(grid, resolution, CountKind::Target)
        );
        tracing::debug!(
            "current contributions:\n{}",
            count_table(grid, CountKind::Current)
        );
        tracing::debug!(
            "target contributions:\n{}",
            count_table(grid, CountKind::Target)
        );
    }
}
