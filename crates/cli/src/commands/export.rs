// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs::File;
use std::io::{BufWriter, Write};

use rl_core::{ExportSnapshot, PendingLog};

use crate::error::{Error, Result};

use super::open_log;

pub fn run(path: Option<&str>) -> Result<()> {
    let (log, _, _) = open_log()?;
    match path {
        None => {
            println!("{}", ExportSnapshot::capture(&log).to_json()?);
            Ok(())
        }
        Some(path) => {
            let count = run_impl(&log, path)?;
            println!("Exported {} operations to {}", count, path);
            Ok(())
        }
    }
}

/// Internal implementation that accepts the log for testing.
pub(crate) fn run_impl(log: &PendingLog, path: &str) -> Result<usize> {
    if path.trim().is_empty() {
        return Err(Error::Config("export path cannot be empty".to_string()));
    }
    let snapshot = ExportSnapshot::capture(log);
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{}", snapshot.to_json()?)?;
    writer.flush()?;
    Ok(snapshot.operations.len())
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
