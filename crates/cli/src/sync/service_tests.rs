// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end tests through the application facade.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use rl_core::{Action, EntityType, ExportSnapshot, FileStore, PendingLog};
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

use super::connectivity::ConnectivityMonitor;
use super::remote::RemoteError;
use super::service::OfflineSync;
use super::test_helpers::*;

fn offline_service() -> (OfflineSync<MockRemote>, MockRemote) {
    let (log, _store, _clock) = memory_log(1_000);
    let remote = MockRemote::new();
    let service = OfflineSync::new(log, remote.clone(), ConnectivityMonitor::new(false));
    (service, remote)
}

#[tokio::test]
async fn producer_created_offline_syncs_on_reconnect() {
    let (service, remote) = offline_service();
    let id = service
        .enqueue(
            EntityType::Producteur,
            Action::Create,
            Some(producteur("KOUASSI JEAN")),
            None,
        )
        .unwrap();

    let entries = service.list_pending();
    assert_eq!(entries.len(), 1);
    assert!(!entries[0].synced);
    assert!(!service.is_online());

    let cancel = CancellationToken::new();
    let task = service.start_auto_sync(cancel.clone());
    service.monitor().set_online(true);
    for _ in 0..200 {
        if service.pending_count() == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let entry = service.list_pending().into_iter().find(|e| e.id == id).unwrap();
    assert!(entry.synced);
    assert_eq!(entry.resolved_id.as_deref(), Some("srv-1"));
    assert!(service.last_sync().is_some());
    assert_eq!(remote.calls().len(), 1);

    cancel.cancel();
    task.await.unwrap();
}

#[tokio::test]
async fn counts_track_pending_and_failed() {
    let (service, remote) = offline_service();
    service
        .enqueue(EntityType::Village, Action::Delete, None, Some("v-1".into()))
        .unwrap();
    service
        .enqueue(EntityType::Village, Action::Delete, None, Some("v-2".into()))
        .unwrap();
    remote.fail_for(
        "v-2",
        RemoteError::Rejected {
            status: 404,
            message: "not found".into(),
        },
    );

    assert_eq!(service.pending_count(), 2);
    assert_eq!(service.failed_count(), 0);

    let summary = service.sync_all().await.unwrap();

    assert_eq!(summary.synced, 1);
    assert_eq!(service.pending_count(), 1);
    assert_eq!(service.failed_count(), 1);
}

#[tokio::test]
async fn cleanup_keeps_failed_entries_and_is_idempotent() {
    let (service, remote) = offline_service();
    service
        .enqueue(EntityType::Agent, Action::Delete, None, Some("a-1".into()))
        .unwrap();
    let failing = service
        .enqueue(EntityType::Agent, Action::Delete, None, Some("a-2".into()))
        .unwrap();
    remote.fail_for("a-2", RemoteError::Timeout);
    service.sync_all().await.unwrap();

    assert_eq!(service.clean_synced_operations().unwrap(), 1);
    let after_first = service.list_pending();
    assert_eq!(service.clean_synced_operations().unwrap(), 0);
    assert_eq!(service.list_pending(), after_first);

    assert_eq!(after_first.len(), 1);
    assert_eq!(after_first[0].id, failing);
    assert!(after_first[0].is_failed());
}

#[tokio::test]
async fn clear_all_and_delete() {
    let (service, _remote) = offline_service();
    let first = service
        .enqueue(EntityType::Section, Action::Delete, None, Some("s-1".into()))
        .unwrap();
    service
        .enqueue(EntityType::Section, Action::Delete, None, Some("s-2".into()))
        .unwrap();

    let removed = service.delete_operation(&first).unwrap();
    assert_eq!(removed.id, first);
    assert!(matches!(
        service.delete_operation(&first),
        Err(rl_core::Error::OperationNotFound(_))
    ));

    assert_eq!(service.clear_all().unwrap(), 1);
    assert!(service.list_pending().is_empty());
}

#[tokio::test]
async fn export_preserves_every_entry_in_order() {
    let (service, _remote) = offline_service();
    let ids: Vec<String> = ["o-1", "o-2", "o-3"]
        .iter()
        .map(|t| {
            service
                .enqueue(EntityType::Organisation, Action::Delete, None, Some(t.to_string()))
                .unwrap()
        })
        .collect();

    let text = service.export_pending_data().unwrap();
    let snapshot = ExportSnapshot::from_json(&text).unwrap();

    let exported: Vec<String> = snapshot.operations.iter().map(|e| e.id.clone()).collect();
    assert_eq!(exported, ids);
    assert_eq!(snapshot.pending, 3);
    assert_eq!(service.list_pending().len(), 3);
}

#[tokio::test]
async fn queue_survives_restart() {
    let dir = tempdir().unwrap();
    let ids: Vec<String> = {
        let log = Arc::new(PendingLog::open(FileStore::open(dir.path()).unwrap()).unwrap());
        let service = OfflineSync::new(log, MockRemote::new(), ConnectivityMonitor::default());
        vec![
            service
                .enqueue(EntityType::Producteur, Action::Create, Some(producteur("A")), None)
                .unwrap(),
            service
                .enqueue(EntityType::Parcelle, Action::Create, Some(parcelle(1.5)), None)
                .unwrap(),
        ]
    };

    let log = Arc::new(PendingLog::open(FileStore::open(dir.path()).unwrap()).unwrap());
    let remote = MockRemote::new();
    let service = OfflineSync::new(log, remote.clone(), ConnectivityMonitor::default());
    let entries = service.list_pending();
    assert_eq!(entries.iter().map(|e| e.id.clone()).collect::<Vec<_>>(), ids);
    assert!(entries.iter().all(|e| !e.synced));

    let summary = service.sync_all().await.unwrap();
    assert_eq!(summary.synced, 2);
    assert_eq!(remote.calls()[1].payload, Some(parcelle(1.5)));
}
