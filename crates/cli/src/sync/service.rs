// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Facade exposed to the application: queueing, status and housekeeping.

use std::sync::Arc;

use rl_core::{
    Action, EntityPayload, EntityType, ExportSnapshot, PendingLog, PendingOperation,
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::connectivity::{spawn_auto_sync, ConnectivityMonitor};
use super::engine::{SyncEngine, SyncError, SyncRunSummary};
use super::remote::RemoteApi;

/// Offline mutation queue bound to a remote and a connectivity monitor.
pub struct OfflineSync<R> {
    engine: Arc<SyncEngine<R>>,
    monitor: ConnectivityMonitor,
}

impl<R: RemoteApi + 'static> OfflineSync<R> {
    pub fn new(log: Arc<PendingLog>, remote: R, monitor: ConnectivityMonitor) -> Self {
        OfflineSync {
            engine: Arc::new(SyncEngine::new(log, remote)),
            monitor,
        }
    }

    pub fn engine(&self) -> &Arc<SyncEngine<R>> {
        &self.engine
    }

    pub fn monitor(&self) -> &ConnectivityMonitor {
        &self.monitor
    }

    fn log(&self) -> &PendingLog {
        self.engine.log()
    }

    /// Queues a mutation and returns its local id.
    pub fn enqueue(
        &self,
        entity_type: EntityType,
        action: Action,
        payload: Option<EntityPayload>,
        target_id: Option<String>,
    ) -> rl_core::Result<String> {
        self.log().enqueue(entity_type, action, payload, target_id)
    }

    /// Returns every entry, synced or not, in insertion order.
    pub fn list_pending(&self) -> Vec<PendingOperation> {
        self.log().list()
    }

    pub fn pending_count(&self) -> usize {
        self.log().pending_count()
    }

    pub fn failed_count(&self) -> usize {
        self.log().failed_count()
    }

    pub fn last_sync(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.log().last_sync()
    }

    pub fn is_online(&self) -> bool {
        self.monitor.is_online()
    }

    /// Runs a synchronization pass now.
    pub async fn sync_all(&self) -> Result<SyncRunSummary, SyncError> {
        self.engine.sync_all().await
    }

    /// Removes synced entries; unsynced and failed entries are kept.
    pub fn clean_synced_operations(&self) -> rl_core::Result<usize> {
        self.log().remove_synced()
    }

    /// Removes every entry.
    pub fn clear_all(&self) -> rl_core::Result<usize> {
        tracing::warn!("clearing all queued operations");
        self.log().remove_all()
    }

    /// Removes one entry.
    pub fn delete_operation(&self, id: &str) -> rl_core::Result<PendingOperation> {
        self.log().remove(id)
    }

    /// Serializes every entry for backup.
    pub fn export_pending_data(&self) -> rl_core::Result<String> {
        ExportSnapshot::capture(self.log()).to_json()
    }

    /// Starts syncing automatically on every offline to online transition.
    pub fn start_auto_sync(&self, cancel: CancellationToken) -> JoinHandle<()> {
        spawn_auto_sync(Arc::clone(&self.engine), &self.monitor, cancel)
    }
}
