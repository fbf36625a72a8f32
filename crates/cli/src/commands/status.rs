// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use serde::Serialize;

use rl_core::PendingLog;

use crate::cli::OutputFormat;
use crate::display::format_last_sync;
use crate::error::Result;
use crate::sync::{parse_base_url, ReachabilityProbe, TcpProbe};

use super::{open_log, runtime};

/// Queue state shown by `relais status`.
#[derive(Debug, Serialize)]
pub(crate) struct StatusReport {
    pub remote: String,
    pub total: usize,
    pub pending: usize,
    pub failed: usize,
    pub last_sync: Option<DateTime<Utc>>,
    pub sync_running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub online: Option<bool>,
}

pub fn run(probe: bool, output: OutputFormat) -> Result<()> {
    let (log, config, _) = open_log()?;
    let mut report = run_impl(&log, &config.remote.url);

    if probe {
        let url = parse_base_url(&config.remote.url)?;
        let probe = TcpProbe::for_url(&url, config.connectivity.probe_timeout())?;
        let online = runtime()?.block_on(probe.probe());
        report.online = Some(online);
    }

    match output {
        OutputFormat::Text => {
            println!("Remote: {}", report.remote);
            if let Some(online) = report.online {
                println!("Reachable: {}", if online { "yes" } else { "no" });
            }
            println!("Pending: {}", report.pending);
            println!("Failed: {}", report.failed);
            println!("Last sync: {}", format_last_sync(report.last_sync.as_ref()));
            if report.sync_running {
                println!("Sync in progress");
            }
            if report.failed > 0 {
                println!();
                println!("Run 'relais list --failed' to see why.");
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

/// Internal implementation that accepts the log for testing.
pub(crate) fn run_impl(log: &PendingLog, remote: &str) -> StatusReport {
    StatusReport {
        remote: remote.to_string(),
        total: log.list().len(),
        pending: log.pending_count(),
        failed: log.failed_count(),
        last_sync: log.last_sync(),
        sync_running: log.is_sync_running(),
        online: None,
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
