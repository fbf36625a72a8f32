// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Synchronization engine.
//!
//! Drains the unsynced entries of a [`PendingLog`] against a [`RemoteApi`],
//! one request at a time, oldest first. Each entry ends the run in one of
//! three states:
//!
//! - synced: the remote accepted it (a create also records the remote id)
//! - failed: the remote call failed and the message is stored on the entry
//! - skipped: an earlier entry for the same record has not synced yet
//!
//! Runs are serialized: only one drains the log at any time, across every
//! engine and process sharing the log's storage.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use rl_core::id::is_local_id;
use rl_core::{Action, FailureKind, OperationPatch, PendingLog, PendingOperation, SyncFailure};
use serde::Serialize;
use tokio::sync::Mutex;

use super::remote::{RemoteApi, RemoteError};

/// How often a waiting run checks whether another process has finished.
const RUN_LOCK_POLL: Duration = Duration::from_millis(50);

/// Error that aborts a synchronization run.
///
/// Remote failures never end up here; they are recorded on their entries.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// An outcome could not be written to local storage.
    #[error("cannot record sync outcome: {0}")]
    Storage(#[from] rl_core::Error),
}

/// A failure recorded during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedEntry {
    pub id: String,
    pub error: String,
    pub kind: FailureKind,
}

/// Outcome of one synchronization run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncRunSummary {
    /// Entries newly synced in this run.
    pub synced: usize,
    /// Entries whose remote call failed in this run.
    pub failed: usize,
    /// Entries left untouched because their record was not ready.
    pub skipped: usize,
    pub failures: Vec<FailedEntry>,
}

impl SyncRunSummary {
    /// Number of entries for which a remote call was made.
    pub fn attempted(&self) -> usize {
        self.synced + self.failed
    }
}

/// Ids resolved so far, in both directions.
#[derive(Default)]
struct Resolution {
    /// Local create id -> remote id.
    remote: HashMap<String, String>,
    /// Remote id -> local create id.
    local: HashMap<String, String>,
    /// Local ids of creates that have not synced.
    unsynced_creates: HashSet<String>,
}

impl Resolution {
    fn from_entries(entries: &[PendingOperation]) -> Self {
        let mut res = Resolution::default();
        for entry in entries.iter().filter(|e| e.action == Action::Create) {
            if !entry.synced {
                res.unsynced_creates.insert(entry.id.clone());
            } else if let Some(ref remote_id) = entry.resolved_id {
                res.resolve(&entry.id, remote_id);
            }
        }
        res
    }

    fn resolve(&mut self, local_id: &str, remote_id: &str) {
        self.unsynced_creates.remove(local_id);
        self.remote
            .insert(local_id.to_string(), remote_id.to_string());
        self.local
            .insert(remote_id.to_string(), local_id.to_string());
    }

    /// Key of the logical record an entry addresses.
    fn record_key(&self, entry: &PendingOperation) -> String {
        match (entry.action, entry.target_id.as_deref()) {
            (Action::Create, _) | (_, None) => entry.id.clone(),
            (_, Some(target)) => self
                .local
                .get(target)
                .cloned()
                .unwrap_or_else(|| target.to_string()),
        }
    }
}

/// Where an update or delete should be sent.
enum Target {
    Remote(String),
    /// The create it depends on has not synced.
    NotReady,
    /// A local id that no entry in the log defines.
    Unknown(String),
    Missing,
}

/// Drains the pending log against a remote.
pub struct SyncEngine<R> {
    log: Arc<PendingLog>,
    remote: R,
    running: Mutex<()>,
}

impl<R: RemoteApi> SyncEngine<R> {
    /// Creates an engine over `log` talking to `remote`.
    pub fn new(log: Arc<PendingLog>, remote: R) -> Self {
        SyncEngine {
            log,
            remote,
            running: Mutex::new(()),
        }
    }

    /// Returns the log this engine drains.
    pub fn log(&self) -> &Arc<PendingLog> {
        &self.log
    }

    /// Runs a synchronization pass, waiting for any run in flight to finish
    /// first.
    pub async fn sync_all(&self) -> Result<SyncRunSummary, SyncError> {
        let _guard = self.running.lock().await;
        let mut waited = false;
        let _lock = loop {
            if let Some(lock) = self.log.try_lock_runs()? {
                break lock;
            }
            if !waited {
                tracing::info!("waiting for sync running in another process");
                waited = true;
            }
            tokio::time::sleep(RUN_LOCK_POLL).await;
        };
        self.run().await
    }

    /// Runs a synchronization pass unless one is already in flight, in which
    /// case this returns `Ok(None)` immediately.
    pub async fn try_sync_all(&self) -> Result<Option<SyncRunSummary>, SyncError> {
        let Ok(_guard) = self.running.try_lock() else {
            tracing::debug!("sync already in progress");
            return Ok(None);
        };
        let Some(_lock) = self.log.try_lock_runs()? else {
            tracing::debug!("sync already in progress in another process");
            return Ok(None);
        };
        self.run().await.map(Some)
    }

    async fn run(&self) -> Result<SyncRunSummary, SyncError> {
        let all = self.log.reload()?;
        let mut resolution = Resolution::from_entries(&all);

        let mut queue: Vec<PendingOperation> = all.into_iter().filter(|e| !e.synced).collect();
        queue.sort_by_key(|e| e.timestamp);

        tracing::debug!(pending = queue.len(), "starting sync run");

        let mut summary = SyncRunSummary::default();
        let mut blocked: HashSet<String> = HashSet::new();

        for entry in queue {
            let key = resolution.record_key(&entry);
            if blocked.contains(&key) {
                tracing::debug!(id = %entry.id, record = %key, "skipping, record not ready");
                summary.skipped += 1;
                continue;
            }

            let outcome = match self.dispatch(&entry, &resolution).await {
                Some(outcome) => outcome,
                None => {
                    tracing::debug!(id = %entry.id, record = %key, "skipping, create not synced");
                    blocked.insert(key);
                    summary.skipped += 1;
                    continue;
                }
            };

            let patch = match outcome {
                Ok(resolved_id) => {
                    if let Some(ref remote_id) = resolved_id {
                        resolution.resolve(&entry.id, remote_id);
                    }
                    summary.synced += 1;
                    tracing::debug!(id = %entry.id, remote_id = ?resolved_id, "synced");
                    OperationPatch::Synced {
                        resolved_id,
                        at: self.log.now(),
                    }
                }
                Err(failure) => {
                    tracing::warn!(
                        id = %entry.id,
                        entity = %entry.entity_type,
                        action = %entry.action,
                        kind = %failure.kind,
                        "sync failed: {}",
                        failure.message
                    );
                    blocked.insert(key);
                    summary.failed += 1;
                    summary.failures.push(FailedEntry {
                        id: entry.id.clone(),
                        error: failure.message.clone(),
                        kind: failure.kind,
                    });
                    OperationPatch::Failed(failure)
                }
            };

            match self.log.update(&entry.id, patch) {
                Ok(()) => {}
                Err(rl_core::Error::OperationNotFound(id)) => {
                    tracing::warn!(%id, "operation removed during sync");
                }
                Err(e) => return Err(SyncError::Storage(e)),
            }
        }

        if summary.attempted() > 0 {
            self.log.set_last_sync(self.log.now())?;
        }

        tracing::info!(
            synced = summary.synced,
            failed = summary.failed,
            skipped = summary.skipped,
            "sync run finished"
        );
        Ok(summary)
    }

    /// Makes the remote call for one entry.
    ///
    /// Returns `None` if the entry must wait for its create, otherwise the
    /// remote id assigned by a create, or the failure.
    async fn dispatch(
        &self,
        entry: &PendingOperation,
        resolution: &Resolution,
    ) -> Option<Result<Option<String>, SyncFailure>> {
        tracing::debug!(
            id = %entry.id,
            entity = %entry.entity_type,
            action = %entry.action,
            "sending operation"
        );

        if entry.action == Action::Create {
            let Some(ref payload) = entry.payload else {
                return Some(Err(missing_payload(entry)));
            };
            let result = self
                .remote
                .create(entry.entity_type, payload)
                .await
                .and_then(|record| {
                    record.id.map(Some).ok_or_else(|| {
                        RemoteError::Decode(format!(
                            "create {} response has no id",
                            entry.entity_type
                        ))
                    })
                });
            return Some(result.map_err(failure));
        }

        let remote_id = match target(entry, resolution) {
            Target::Remote(id) => id,
            Target::NotReady => return None,
            Target::Unknown(id) => {
                return Some(Err(SyncFailure::new(
                    FailureKind::Rejection,
                    format!("target {} is not a known local record", id),
                )))
            }
            Target::Missing => {
                return Some(Err(SyncFailure::new(
                    FailureKind::Rejection,
                    format!("{} {} has no target id", entry.action, entry.entity_type),
                )))
            }
        };

        let result = match entry.action {
            Action::Update => match entry.payload {
                Some(ref payload) => self
                    .remote
                    .update(entry.entity_type, &remote_id, payload)
                    .await
                    .map(|_| None),
                None => return Some(Err(missing_payload(entry))),
            },
            _ => self
                .remote
                .delete(entry.entity_type, &remote_id)
                .await
                .map(|()| None),
        };
        Some(result.map_err(failure))
    }
}

fn target(entry: &PendingOperation, resolution: &Resolution) -> Target {
    let Some(ref target) = entry.target_id else {
        return Target::Missing;
    };
    if resolution.unsynced_creates.contains(target) {
        return Target::NotReady;
    }
    if let Some(remote_id) = resolution.remote.get(target) {
        return Target::Remote(remote_id.clone());
    }
    if is_local_id(target) {
        return Target::Unknown(target.clone());
    }
    Target::Remote(target.clone())
}

/// Rejections keep the remote's own message; other failures are described.
fn failure(err: RemoteError) -> SyncFailure {
    let kind = err.kind();
    match err {
        RemoteError::Rejected { message, .. } => SyncFailure::new(kind, message),
        other => SyncFailure::new(kind, other.to_string()),
    }
}

fn missing_payload(entry: &PendingOperation) -> SyncFailure {
    SyncFailure::new(
        FailureKind::Rejection,
        format!("{} {} has no payload", entry.action, entry.entity_type),
    )
}
