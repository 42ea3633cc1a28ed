//! CLI entry point for contribution calendar synthesis

use clap::Parser;
use contribsynth::io::cli::{Cli, Synthesizer, init_logging};

fn main() -> contribsynth::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_filter());

    let summary = Synthesizer::new(cli).process()?;
    tracing::info!(
        scale = summary.resolution.scale,
        emitted = summary.report.emitted,
        simulated = summary.simulated,
        "finished"
    );
    Ok(())
}
