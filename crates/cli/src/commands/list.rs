// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use rl_core::{PendingLog, PendingOperation};

use crate::cli::{ListFilter, OutputFormat};
use crate::display::{format_entry_error, format_entry_line};
use crate::error::Result;

use super::open_log;

pub fn run(filter: ListFilter, output: OutputFormat) -> Result<()> {
    let (log, _, _) = open_log()?;
    let entries = run_impl(&log, filter);

    match output {
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("No operations");
            }
            for op in &entries {
                println!("{}", format_entry_line(op));
                if let Some(line) = format_entry_error(op) {
                    println!("{}", line);
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }
    Ok(())
}

/// Internal implementation that accepts the log for testing.
pub(crate) fn run_impl(log: &PendingLog, filter: ListFilter) -> Vec<PendingOperation> {
    log.list()
        .into_iter()
        .filter(|op| {
            if filter.pending {
                op.is_pending()
            } else if filter.failed {
                op.is_failed()
            } else if filter.synced {
                op.synced
            } else {
                true
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
