// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The pending operation log.
//!
//! Holds every mutation intent not yet confirmed by the remote system, plus
//! synced intents kept for audit until explicitly purged. Entries are kept in
//! insertion order and persisted as JSONL under a single store key.
//!
//! Storage is the source of truth. Every mutation re-reads the entries under
//! the store's exclusive lock, applies the change and writes the result, so
//! several handles (or processes) over one store never lose each other's
//! writes. Reads go to storage too; the last entries read are cached and
//! served if storage cannot be read. A failed write leaves storage at the
//! previous state.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::clock::{Clock, SystemClock};
use crate::entity::{Action, EntityType};
use crate::error::{Error, Result};
use crate::id::generate_unique_id;
use crate::jsonl;
use crate::payload::EntityPayload;
use crate::pending::{OperationPatch, PendingOperation};
use crate::store::{DurableStore, RunLock};

/// Store key holding the JSONL-encoded entries.
pub const PENDING_KEY: &str = "pending_operations";
/// Store key holding the RFC 3339 last-sync instant.
pub const LAST_SYNC_KEY: &str = "last_sync";

pub struct PendingLog {
    store: Box<dyn DurableStore>,
    clock: Arc<dyn Clock>,
    entries: Mutex<Vec<PendingOperation>>,
    last_sync: Mutex<Option<DateTime<Utc>>>,
    seq: AtomicU64,
}

impl PendingLog {
    /// Opens the log stored in `store`, using the system clock.
    pub fn open(store: impl DurableStore + 'static) -> Result<Self> {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Opens the log stored in `store` with a custom clock.
    pub fn with_clock(store: impl DurableStore + 'static, clock: Arc<dyn Clock>) -> Result<Self> {
        let entries = decode_entries(store.get(PENDING_KEY)?)?;
        let last_sync = decode_last_sync(store.get(LAST_SYNC_KEY)?)?;

        tracing::debug!(entries = entries.len(), "opened pending log");

        Ok(PendingLog {
            store: Box::new(store),
            clock,
            entries: Mutex::new(entries),
            last_sync: Mutex::new(last_sync),
            seq: AtomicU64::new(0),
        })
    }

    /// Returns the current time according to the log's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PendingOperation>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Reads the entries from storage and refreshes the cache.
    pub fn reload(&self) -> Result<Vec<PendingOperation>> {
        let mut cache = self.lock();
        let entries = decode_entries(self.store.get(PENDING_KEY)?)?;
        *cache = entries.clone();
        Ok(entries)
    }

    /// Entries as currently stored, or the cached ones if storage can't be read.
    fn current(&self) -> MutexGuard<'_, Vec<PendingOperation>> {
        let mut cache = self.lock();
        match self
            .store
            .get(PENDING_KEY)
            .and_then(decode_entries)
        {
            Ok(entries) => *cache = entries,
            Err(e) => tracing::warn!(error = %e, "reading pending log failed, using cached entries"),
        }
        cache
    }

    /// Applies `f` to the stored entries under the store's lock and writes
    /// the result back.
    fn mutate<T>(&self, f: impl FnOnce(&mut Vec<PendingOperation>) -> Result<T>) -> Result<T> {
        let mut cache = self.lock();
        let mut out = None;
        let mut next = None;
        self.store.update(
            PENDING_KEY,
            Box::new(|current| {
                let mut entries = decode_entries(current)?;
                out = Some(f(&mut entries)?);
                let text = jsonl::encode(&entries)?;
                next = Some(entries);
                Ok(text)
            }),
        )?;
        match (out, next) {
            (Some(out), Some(entries)) => {
                *cache = entries;
                Ok(out)
            }
            _ => Err(Error::StorageUnavailable(
                "store did not apply the update".to_string(),
            )),
        }
    }

    /// Appends a new unsynced entry and returns its id.
    ///
    /// The entry is committed to storage before this returns. Fails with
    /// [`Error::StorageFull`] or [`Error::StorageUnavailable`] if it cannot be.
    pub fn enqueue(
        &self,
        entity_type: EntityType,
        action: Action,
        payload: Option<EntityPayload>,
        target_id: Option<String>,
    ) -> Result<String> {
        let timestamp = self.clock.now();
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);

        let id = self.mutate(|entries| {
            let id = generate_unique_id(entity_type, action, &timestamp, seq, |candidate| {
                entries.iter().any(|e| e.id == candidate)
            });
            let op = PendingOperation::new(
                id.clone(),
                entity_type,
                action,
                payload,
                target_id,
                timestamp,
            )?;
            entries.push(op);
            Ok(id)
        })?;

        tracing::debug!(%id, entity = %entity_type, action = %action, "enqueued operation");
        Ok(id)
    }

    /// Returns all entries in insertion order.
    pub fn list(&self) -> Vec<PendingOperation> {
        self.current().clone()
    }

    /// Returns the entry with the given id.
    pub fn get(&self, id: &str) -> Option<PendingOperation> {
        self.current().iter().find(|e| e.id == id).cloned()
    }

    /// Number of entries not yet confirmed by the remote system.
    pub fn pending_count(&self) -> usize {
        self.current().iter().filter(|e| e.is_pending()).count()
    }

    /// Number of unsynced entries whose last attempt failed.
    pub fn failed_count(&self) -> usize {
        self.current().iter().filter(|e| e.is_failed()).count()
    }

    /// Updates the mutable fields of the entry with the given id.
    ///
    /// Entries are never recreated implicitly: a missing id is an error.
    pub fn update(&self, id: &str, patch: OperationPatch) -> Result<()> {
        self.mutate(|entries| {
            let entry = entries
                .iter_mut()
                .find(|e| e.id == id)
                .ok_or_else(|| Error::OperationNotFound(id.to_string()))?;
            entry.apply(patch)
        })
    }

    /// Removes the entry with the given id.
    pub fn remove(&self, id: &str) -> Result<PendingOperation> {
        let removed = self.mutate(|entries| {
            let index = entries
                .iter()
                .position(|e| e.id == id)
                .ok_or_else(|| Error::OperationNotFound(id.to_string()))?;
            Ok(entries.remove(index))
        })?;
        tracing::debug!(%id, "removed operation");
        Ok(removed)
    }

    /// Removes synced entries and returns how many were removed.
    ///
    /// Never removes an unsynced entry. A synced create whose local id is
    /// still the target of an unsynced update or delete is kept so the
    /// dependent entry can resolve it; a later cleanup removes it.
    pub fn remove_synced(&self) -> Result<usize> {
        if !self.current().iter().any(|e| e.synced) {
            return Ok(0);
        }

        let removed = self.mutate(|entries| {
            let referenced: HashSet<String> = entries
                .iter()
                .filter(|e| !e.synced)
                .filter_map(|e| e.target_id.clone())
                .collect();

            let before = entries.len();
            entries.retain(|e| {
                !e.synced || (e.action == Action::Create && referenced.contains(&e.id))
            });
            Ok(before - entries.len())
        })?;

        tracing::debug!(removed, "removed synced operations");
        Ok(removed)
    }

    /// Removes every entry, synced or not, and returns how many were removed.
    pub fn remove_all(&self) -> Result<usize> {
        let removed = self.mutate(|entries| {
            let count = entries.len();
            entries.clear();
            Ok(count)
        })?;
        tracing::debug!(removed, "cleared pending log");
        Ok(removed)
    }

    /// Returns the instant of the last synchronization run, if any.
    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        let mut cached = self.last_sync.lock().unwrap_or_else(|e| e.into_inner());
        match self
            .store
            .get(LAST_SYNC_KEY)
            .and_then(decode_last_sync)
        {
            Ok(at) => *cached = at,
            Err(e) => tracing::warn!(error = %e, "reading last sync failed, using cached value"),
        }
        *cached
    }

    /// Records the instant of a synchronization run.
    pub fn set_last_sync(&self, at: DateTime<Utc>) -> Result<()> {
        let mut last_sync = self.last_sync.lock().unwrap_or_else(|e| e.into_inner());
        self.store.set(LAST_SYNC_KEY, &at.to_rfc3339())?;
        *last_sync = Some(at);
        Ok(())
    }

    /// Claims the right to run a synchronization pass over this log's
    /// storage, or returns `None` if another handle holds it.
    pub fn try_lock_runs(&self) -> Result<Option<RunLock>> {
        self.store.try_lock_runs()
    }

    /// Returns true if some handle on this log's storage is running a
    /// synchronization pass.
    pub fn is_sync_running(&self) -> bool {
        matches!(self.store.try_lock_runs(), Ok(None))
    }
}

fn decode_entries(text: Option<String>) -> Result<Vec<PendingOperation>> {
    match text {
        Some(text) => jsonl::decode(&text),
        None => Ok(Vec::new()),
    }
}

fn decode_last_sync(text: Option<String>) -> Result<Option<DateTime<Utc>>> {
    match text {
        Some(text) if !text.trim().is_empty() => Ok(Some(
            DateTime::parse_from_rfc3339(text.trim())
                .map_err(|e| Error::CorruptedData(format!("last sync '{}': {}", text, e)))?
                .with_timezone(&Utc),
        )),
        _ => Ok(None),
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
