// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::SyncError;

/// All possible errors that can occur in the rlrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'relais init --remote <url>' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid payload JSON: {reason}\n  hint: pass a JSON object, e.g. --data '{{\"nom_complet\":\"KOUASSI JEAN\"}}'")]
    InvalidPayloadJson { reason: String },

    #[error("{0}\n  hint: the mutation was not saved; free space on the device and enqueue it again")]
    NotSaved(rl_core::Error),

    #[error("operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Core(#[from] rl_core::Error),

    #[error("sync aborted: {0}")]
    Sync(#[from] SyncError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for rlrs operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
