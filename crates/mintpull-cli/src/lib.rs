//! Command-line front end for `mintpull-core`.

pub mod cli_args;

use anyhow::Result;
use mintpull_core::{LoggingDestination, RunSummary, Tunables, init_logging};

pub use cli_args::Cli;

/// Installs logging, reads the environment and runs the pull described by `cli`.
pub async fn run(cli: Cli) -> Result<RunSummary> {
    if let Err(err) = init_logging(LoggingDestination::FileAndStderr) {
        eprintln!("Warning: {err}; logging to stderr only");
        let _ = init_logging(LoggingDestination::StderrOnly);
    }

    let tunables = Tunables::from_env()?;
    let config = cli.into_run_config();
    let summary = mintpull_core::run(config, tunables).await?;

    println!(
        "Processed {} batch(es): {} persisted, {} failed, {} missing, {} skipped, {} change(s)",
        summary.batches,
        summary.persisted,
        summary.failed,
        summary.missing,
        summary.skipped,
        summary.changes
    );
    Ok(summary)
}
