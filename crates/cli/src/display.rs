// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use rl_core::PendingOperation;

use crate::sync::SyncRunSummary;

/// Maximum displayed length of a failure message on a list line.
const ERROR_WIDTH: usize = 80;

/// Short state label of an entry.
pub fn state_label(op: &PendingOperation) -> &'static str {
    if op.synced {
        "synced"
    } else if op.is_failed() {
        "failed"
    } else {
        "pending"
    }
}

/// Format a timestamp for display.
pub fn format_time(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Format the last-sync instant, or "never".
pub fn format_last_sync(at: Option<&DateTime<Utc>>) -> String {
    match at {
        Some(at) => format_time(at),
        None => "never".to_string(),
    }
}

fn truncate(text: &str, width: usize) -> String {
    let first_line = text.lines().next().unwrap_or("");
    if first_line.chars().count() <= width && !text.contains('\n') {
        return first_line.to_string();
    }
    let cut: String = first_line.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", cut)
}

/// Format one entry as a list line.
///
/// Example: `local-3f2a9c01b4de  [pending] producteur create "KOUASSI JEAN"`
pub fn format_entry_line(op: &PendingOperation) -> String {
    let mut line = format!(
        "{}  [{}] {} {}",
        op.id,
        state_label(op),
        op.entity_type,
        op.action
    );
    if let Some(ref target) = op.target_id {
        line.push_str(&format!(" {}", target));
    }
    if let Some(label) = op.payload.as_ref().and_then(|p| p.label()) {
        line.push_str(&format!(" \"{}\"", label));
    }
    if let Some(ref remote_id) = op.resolved_id {
        line.push_str(&format!(" -> {}", remote_id));
    }
    line
}

/// Format the failure line shown under a failed entry.
pub fn format_entry_error(op: &PendingOperation) -> Option<String> {
    let failure = op.failure()?;
    Some(format!(
        "    {}: {}",
        failure.kind,
        truncate(&failure.message, ERROR_WIDTH)
    ))
}

/// Format a run summary as a single line.
pub fn format_summary(summary: &SyncRunSummary) -> String {
    let mut line = format!("Synced {}, failed {}", summary.synced, summary.failed);
    if summary.skipped > 0 {
        line.push_str(&format!(", skipped {}", summary.skipped));
    }
    line
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
