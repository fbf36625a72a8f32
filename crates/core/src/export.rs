// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Full-log snapshots for manual backup before a destructive reset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::log::PendingLog;
use crate::pending::PendingOperation;

/// Version of the snapshot layout.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Order-preserving copy of every entry in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSnapshot {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub last_sync: Option<DateTime<Utc>>,
    pub pending: usize,
    pub failed: usize,
    pub operations: Vec<PendingOperation>,
}

impl ExportSnapshot {
    /// Captures the current state of `log`. Pure read.
    pub fn capture(log: &PendingLog) -> Self {
        let operations = log.list();
        ExportSnapshot {
            version: SNAPSHOT_VERSION,
            exported_at: log.now(),
            last_sync: log.last_sync(),
            pending: operations.iter().filter(|e| e.is_pending()).count(),
            failed: operations.iter().filter(|e| e.is_failed()).count(),
            operations,
        }
    }

    /// Serializes the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a snapshot previously produced by [`ExportSnapshot::to_json`].
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
