// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! JSONL (JSON Lines) encoding.
//!
//! Records are stored one JSON object per line so that insertion order is
//! the line order and a partially written file is easy to diagnose.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};

/// Encodes records as JSON Lines, one record per line.
pub fn encode<T: Serialize>(records: &[T]) -> Result<String> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

/// Decodes JSON Lines into records.
///
/// Skips empty lines. A line that does not parse is reported with its
/// 1-based line number.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<Vec<T>> {
    let mut records = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: T = serde_json::from_str(line)
            .map_err(|e| Error::CorruptedData(format!("line {}: {}", index + 1, e)))?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
#[path = "jsonl_tests.rs"]
mod tests;
