// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pending operations: queued mutation intents awaiting remote confirmation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::{Action, EntityType};
use crate::error::{Error, Result};
use crate::payload::EntityPayload;

/// Classification of a failed remote call, used for user-facing messaging.
///
/// Retry policy does not depend on the kind: every unsynced entry is retried
/// on the next run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No response from the remote system (offline, DNS, timeout).
    Connectivity,
    /// The remote system refused the payload (4xx).
    Rejection,
    /// The remote system failed unexpectedly (5xx, unreadable response).
    Server,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Connectivity => "connectivity",
            FailureKind::Rejection => "rejection",
            FailureKind::Server => "server",
        }
    }

    /// Returns true if a blind retry is expected to fail the same way.
    pub fn is_sticky(&self) -> bool {
        matches!(self, FailureKind::Rejection)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The outcome of a failed attempt, as recorded on the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl SyncFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        SyncFailure {
            kind,
            message: message.into(),
        }
    }
}

/// A change to the mutable fields of a pending operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationPatch {
    /// The remote call succeeded.
    Synced {
        /// Remote id assigned by a successful create.
        resolved_id: Option<String>,
        at: DateTime<Utc>,
    },
    /// The remote call failed.
    Failed(SyncFailure),
}

/// One queued mutation intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingOperation {
    /// Local id, stable for the life of the entry.
    pub id: String,
    pub entity_type: EntityType,
    pub action: Action,
    /// Absent for delete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<EntityPayload>,
    /// Record addressed by update/delete: a remote id, or the local id of a
    /// pending create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub synced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<FailureKind>,
    /// Remote id returned by a successful create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synced_at: Option<DateTime<Utc>>,
}

impl PendingOperation {
    /// Builds a new unsynced entry after checking that the action, payload and
    /// target are consistent with each other.
    pub fn new(
        id: String,
        entity_type: EntityType,
        action: Action,
        payload: Option<EntityPayload>,
        target_id: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        if let Some(ref p) = payload {
            if p.entity_type() != entity_type {
                return Err(Error::PayloadMismatch {
                    entity: entity_type.to_string(),
                    payload: p.entity_type().to_string(),
                });
            }
        }

        let payload = match action {
            Action::Create => {
                if let Some(target) = target_id {
                    return Err(Error::UnexpectedTargetId(target));
                }
                Some(payload.ok_or(Error::MissingPayload { action: "create" })?)
            }
            Action::Update => Some(payload.ok_or(Error::MissingPayload { action: "update" })?),
            Action::Delete => None,
        };

        let target_id = match action {
            Action::Create => None,
            Action::Update | Action::Delete => {
                let target = target_id
                    .filter(|t| !t.trim().is_empty())
                    .ok_or(Error::MissingTargetId {
                        action: action.as_str(),
                    })?;
                Some(target)
            }
        };

        Ok(PendingOperation {
            id,
            entity_type,
            action,
            payload,
            target_id,
            timestamp,
            synced: false,
            error: None,
            error_kind: None,
            resolved_id: None,
            synced_at: None,
        })
    }

    /// Returns true if the last attempt failed and the entry is still unsynced.
    pub fn is_failed(&self) -> bool {
        !self.synced && self.error.is_some()
    }

    /// Returns true if the entry has not been confirmed by the remote system.
    pub fn is_pending(&self) -> bool {
        !self.synced
    }

    /// Returns the recorded failure, if any.
    pub fn failure(&self) -> Option<SyncFailure> {
        match (&self.error, self.error_kind) {
            (Some(message), Some(kind)) => Some(SyncFailure::new(kind, message.clone())),
            (Some(message), None) => Some(SyncFailure::new(FailureKind::Server, message.clone())),
            _ => None,
        }
    }

    /// Applies a patch to the mutable fields.
    ///
    /// A synced entry never goes back to unsynced, and records at most one
    /// success.
    pub fn apply(&mut self, patch: OperationPatch) -> Result<()> {
        if self.synced {
            return Err(Error::AlreadySynced(self.id.clone()));
        }
        match patch {
            OperationPatch::Synced { resolved_id, at } => {
                self.synced = true;
                self.synced_at = Some(at);
                self.error = None;
                self.error_kind = None;
                if self.action == Action::Create {
                    self.resolved_id = resolved_id;
                }
            }
            OperationPatch::Failed(failure) => {
                self.error = Some(failure.message);
                self.error_kind = Some(failure.kind);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;
