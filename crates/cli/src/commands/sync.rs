// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Manual synchronization.

use crate::cli::OutputFormat;
use crate::display::format_summary;
use crate::error::Result;
use crate::sync::{RemoteApi, SyncEngine, SyncRunSummary};

use super::{open_log, open_remote, runtime};

/// Runs one sync pass. Exits successfully even when entries failed; the
/// failures are listed in the output.
pub fn run(output: OutputFormat) -> Result<()> {
    let (log, config, _) = open_log()?;
    let engine = SyncEngine::new(log, open_remote(&config)?);
    let summary = runtime()?.block_on(run_impl(&engine))?;

    match output {
        OutputFormat::Text => {
            if summary.attempted() == 0 && summary.skipped == 0 {
                println!("Nothing to sync");
                return Ok(());
            }
            println!("{}", format_summary(&summary));
            for failure in &summary.failures {
                println!("  {}: {}: {}", failure.id, failure.kind, failure.error);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}

/// Internal implementation that accepts the engine for testing.
pub(crate) async fn run_impl<R: RemoteApi>(engine: &SyncEngine<R>) -> Result<SyncRunSummary> {
    Ok(engine.sync_all().await?)
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
