// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use rl_core::PendingLog;

use crate::error::{Error, Result};

use super::open_log;

pub fn run(yes: bool) -> Result<()> {
    let (log, _, _) = open_log()?;
    let removed = run_impl(&log, yes)?;
    println!("Removed {} operations", removed);
    Ok(())
}

/// Internal implementation that accepts the log for testing.
pub(crate) fn run_impl(log: &PendingLog, yes: bool) -> Result<usize> {
    if !yes {
        let pending = log.pending_count();
        eprintln!(
            "This removes all {} queued operations ({} not yet synced).",
            log.list().len(),
            pending
        );
        eprintln!("Run 'relais export <file>' first to keep a backup, then re-run with --yes.");
        return Err(Error::Cancelled);
    }
    Ok(log.remove_all()?)
}

#[cfg(test)]
#[path = "clear_tests.rs"]
mod tests;
