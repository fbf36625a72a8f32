// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for rl-core operations.

use thiserror::Error;

/// All possible errors that can occur in rl-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("device storage is full: {0}\n  hint: free some space on the device; the mutation was not saved")]
    StorageFull(String),

    #[error("device storage is unavailable: {0}")]
    StorageUnavailable(String),

    #[error("pending operation not found: {0}")]
    OperationNotFound(String),

    #[error("pending operation {0} is already synced")]
    AlreadySynced(String),

    #[error("invalid entity type: '{0}'\n  hint: valid types are: operation, producteur, parcelle, agent, organisation, section, village")]
    InvalidEntityType(String),

    #[error("invalid action: '{0}'\n  hint: valid actions are: create, update, delete")]
    InvalidAction(String),

    #[error("payload is for '{payload}' but the operation targets '{entity}'")]
    PayloadMismatch { entity: String, payload: String },

    #[error("{action} requires a payload")]
    MissingPayload { action: &'static str },

    #[error("{action} requires a target id")]
    MissingTargetId { action: &'static str },

    #[error("create must not carry a target id (got '{0}')\n  hint: the remote id is assigned once the create has synced")]
    UnexpectedTargetId(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::StorageFull {
            Error::StorageFull(e.to_string())
        } else {
            Error::StorageUnavailable(e.to_string())
        }
    }
}

impl Error {
    /// Returns true for failures of the on-device storage medium.
    pub fn is_storage(&self) -> bool {
        matches!(self, Error::StorageFull(_) | Error::StorageUnavailable(_))
    }
}

/// A specialized Result type for rl-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
