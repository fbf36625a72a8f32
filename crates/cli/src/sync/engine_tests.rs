// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the synchronization engine.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use rl_core::{Action, DurableStore, EntityType, FailureKind, PendingLog, StoreFault};

use super::engine::{SyncEngine, SyncError};
use super::remote::RemoteError;
use super::test_helpers::*;

fn rejected(message: &str) -> RemoteError {
    RemoteError::Rejected {
        status: 422,
        message: message.to_string(),
    }
}

#[tokio::test]
async fn empty_log_is_a_noop() {
    let (log, _store, _clock) = memory_log(1_000);
    let remote = MockRemote::new();
    let engine = SyncEngine::new(log.clone(), remote.clone());

    let summary = engine.sync_all().await.unwrap();

    assert_eq!(summary.attempted(), 0);
    assert!(remote.calls().is_empty());
    assert_eq!(log.last_sync(), None);
}

#[tokio::test]
async fn create_records_remote_id() {
    let (log, _store, clock) = memory_log(1_000);
    let id = enqueue_create(&log, &clock, "KOUASSI JEAN");
    let remote = MockRemote::new();
    let engine = SyncEngine::new(log.clone(), remote.clone());

    let summary = engine.sync_all().await.unwrap();

    assert_eq!(summary.synced, 1);
    let entry = log.get(&id).unwrap();
    assert!(entry.synced);
    assert_eq!(entry.resolved_id.as_deref(), Some("srv-1"));
    assert_eq!(entry.error, None);
    assert!(entry.synced_at.is_some());
    assert_eq!(remote.calls_for(Action::Create)[0].payload, Some(producteur("KOUASSI JEAN")));
}

#[tokio::test]
async fn failure_is_isolated_to_its_entry() {
    let (log, _store, clock) = memory_log(1_000);
    let first = enqueue_create(&log, &clock, "A");
    let second = enqueue_create(&log, &clock, "B");
    let third = enqueue_create(&log, &clock, "C");
    let remote = MockRemote::new();
    remote.script([None, Some(RemoteError::Timeout), None]);
    let engine = SyncEngine::new(log.clone(), remote.clone());

    let summary = engine.sync_all().await.unwrap();

    assert_eq!(summary.synced, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].id, second);
    assert_eq!(summary.failures[0].kind, FailureKind::Connectivity);

    assert!(log.get(&first).unwrap().synced);
    assert!(log.get(&third).unwrap().synced);
    let failed = log.get(&second).unwrap();
    assert!(!failed.synced);
    assert_eq!(failed.error.as_deref(), Some("request timed out"));
    assert_eq!(failed.error_kind, Some(FailureKind::Connectivity));
}

#[tokio::test]
async fn update_waits_for_failed_create() {
    let (log, _store, clock) = memory_log(1_000);
    let create = enqueue_create(&log, &clock, "KOUASSI JEAN");
    let update = enqueue_update(&log, &clock, &create, "KOUASSI JEAN-BAPTISTE");
    let remote = MockRemote::new();
    remote.script([Some(RemoteError::Connectivity("offline".into()))]);
    let engine = SyncEngine::new(log.clone(), remote.clone());

    let summary = engine.sync_all().await.unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.skipped, 1);
    assert!(remote.calls_for(Action::Update).is_empty());
    let entry = log.get(&update).unwrap();
    assert!(!entry.synced);
    assert_eq!(entry.error, None);
}

#[tokio::test]
async fn update_after_create_uses_remote_id() {
    let (log, _store, clock) = memory_log(1_000);
    let create = enqueue_create(&log, &clock, "KOUASSI JEAN");
    let update = enqueue_update(&log, &clock, &create, "KOUASSI JEAN-BAPTISTE");
    let delete = enqueue_delete(&log, &clock, &create);
    let remote = MockRemote::new();
    let engine = SyncEngine::new(log.clone(), remote.clone());

    let summary = engine.sync_all().await.unwrap();

    assert_eq!(summary.synced, 3);
    let calls = remote.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].action, Action::Create);
    assert_eq!(calls[1].action, Action::Update);
    assert_eq!(calls[1].id.as_deref(), Some("srv-1"));
    assert_eq!(calls[2].action, Action::Delete);
    assert_eq!(calls[2].id.as_deref(), Some("srv-1"));
    assert!(log.get(&update).unwrap().synced);
    assert!(log.get(&delete).unwrap().synced);
}

#[tokio::test]
async fn dependent_update_syncs_on_later_run() {
    let (log, _store, clock) = memory_log(1_000);
    let create = enqueue_create(&log, &clock, "KOUASSI JEAN");
    let update = enqueue_update(&log, &clock, &create, "KOUASSI JEAN-BAPTISTE");
    let remote = MockRemote::new();
    remote.set_offline(true);
    let engine = SyncEngine::new(log.clone(), remote.clone());

    engine.sync_all().await.unwrap();
    assert!(!log.get(&create).unwrap().synced);

    remote.set_offline(false);
    let summary = engine.sync_all().await.unwrap();

    assert_eq!(summary.synced, 2);
    assert_eq!(remote.calls_for(Action::Update)[0].id.as_deref(), Some("srv-1"));
    assert!(log.get(&update).unwrap().synced);
}

#[tokio::test]
async fn update_resolves_create_synced_in_earlier_run() {
    let (log, _store, clock) = memory_log(1_000);
    let create = enqueue_create(&log, &clock, "KOUASSI JEAN");
    let remote = MockRemote::new();
    let engine = SyncEngine::new(log.clone(), remote.clone());
    engine.sync_all().await.unwrap();

    enqueue_update(&log, &clock, &create, "KOUASSI JEAN-BAPTISTE");
    log.remove_synced().unwrap();
    let summary = engine.sync_all().await.unwrap();

    assert_eq!(summary.synced, 1);
    assert_eq!(remote.calls_for(Action::Update)[0].id.as_deref(), Some("srv-1"));
}

#[tokio::test]
async fn failed_update_blocks_later_entries_for_same_record() {
    let (log, _store, clock) = memory_log(1_000);
    let first = enqueue_update(&log, &clock, "p-123", "A");
    let second = enqueue_update(&log, &clock, "p-123", "B");
    let other = enqueue_update(&log, &clock, "p-456", "C");
    let remote = MockRemote::new();
    remote.script([Some(RemoteError::Server {
        status: 503,
        message: "maintenance".into(),
    })]);
    let engine = SyncEngine::new(log.clone(), remote.clone());

    let summary = engine.sync_all().await.unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.synced, 1);
    assert!(log.get(&first).unwrap().is_failed());
    assert!(log.get(&second).unwrap().is_pending());
    assert!(log.get(&other).unwrap().synced);
}

#[tokio::test]
async fn rejection_repeats_on_every_run() {
    let (log, _store, clock) = memory_log(1_000);
    let update = enqueue_update(&log, &clock, "p-123", "");
    let remote = MockRemote::new();
    remote.fail_for("p-123", rejected("nom_complet is required"));
    let engine = SyncEngine::new(log.clone(), remote.clone());

    for _ in 0..2 {
        let summary = engine.sync_all().await.unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures[0].kind, FailureKind::Rejection);
        let entry = log.get(&update).unwrap();
        assert!(!entry.synced);
        assert_eq!(entry.error.as_deref(), Some("nom_complet is required"));
    }
    assert_eq!(remote.calls_for(Action::Update).len(), 2);
}

#[tokio::test]
async fn synced_entry_is_never_sent_again() {
    let (log, _store, clock) = memory_log(1_000);
    let failing = enqueue_update(&log, &clock, "p-1", "A");
    enqueue_create(&log, &clock, "B");
    let remote = MockRemote::new();
    remote.fail_for("p-1", RemoteError::Timeout);
    let engine = SyncEngine::new(log.clone(), remote.clone());

    engine.sync_all().await.unwrap();
    engine.sync_all().await.unwrap();
    remote.clear_failure("p-1");
    engine.sync_all().await.unwrap();
    engine.sync_all().await.unwrap();

    assert_eq!(remote.calls_for(Action::Create).len(), 1);
    assert_eq!(remote.calls_for(Action::Update).len(), 3);
    let entry = log.get(&failing).unwrap();
    assert!(entry.synced);
    assert_eq!(entry.error, None);
    assert_eq!(entry.error_kind, None);
}

#[tokio::test]
async fn entries_sync_oldest_first() {
    let (log, _store, clock) = memory_log(1_000);
    enqueue_update(&log, &clock, "p-1", "first");
    enqueue_update(&log, &clock, "p-2", "second");
    enqueue_update(&log, &clock, "p-3", "third");
    let remote = MockRemote::new();
    let engine = SyncEngine::new(log.clone(), remote.clone());

    engine.sync_all().await.unwrap();

    let ids: Vec<_> = remote
        .calls()
        .into_iter()
        .map(|c| c.id.unwrap_or_default())
        .collect();
    assert_eq!(ids, vec!["p-1", "p-2", "p-3"]);
}

#[tokio::test]
async fn unknown_local_target_fails_without_remote_call() {
    let (log, _store, clock) = memory_log(1_000);
    let create = enqueue_create(&log, &clock, "A");
    let delete = enqueue_delete(&log, &clock, &create);
    log.remove(&create).unwrap();
    let remote = MockRemote::new();
    let engine = SyncEngine::new(log.clone(), remote.clone());

    let summary = engine.sync_all().await.unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures[0].kind, FailureKind::Rejection);
    assert!(remote.calls().is_empty());
    assert!(log.get(&delete).unwrap().is_failed());
}

#[tokio::test]
async fn last_sync_written_when_something_was_attempted() {
    let (log, _store, clock) = memory_log(5_000);
    enqueue_update(&log, &clock, "p-1", "A");
    let remote = MockRemote::new();
    remote.set_offline(true);
    let engine = SyncEngine::new(log.clone(), remote.clone());

    engine.sync_all().await.unwrap();

    assert_eq!(log.last_sync().unwrap().timestamp_millis(), 5_001);
}

#[tokio::test]
async fn last_sync_untouched_when_nothing_pending() {
    let (log, _store, clock) = memory_log(5_000);
    enqueue_create(&log, &clock, "A");
    let remote = MockRemote::new();
    let engine = SyncEngine::new(log.clone(), remote.clone());
    engine.sync_all().await.unwrap();
    let first = log.last_sync();
    assert!(first.is_some());

    clock.advance(1_000);
    let summary = engine.sync_all().await.unwrap();

    assert_eq!(summary.attempted(), 0);
    assert_eq!(log.last_sync(), first);
}

#[tokio::test]
async fn try_sync_all_skips_while_running() {
    let (log, _store, clock) = memory_log(1_000);
    enqueue_create(&log, &clock, "A");
    let remote = MockRemote::new();
    remote.set_delay(Duration::from_millis(50));
    let engine = SyncEngine::new(log.clone(), remote.clone());

    let (first, second) = tokio::join!(engine.sync_all(), engine.try_sync_all());

    assert_eq!(first.unwrap().synced, 1);
    assert!(second.unwrap().is_none());
    assert_eq!(remote.calls().len(), 1);
}

#[tokio::test]
async fn concurrent_runs_never_send_an_entry_twice() {
    let (log, _store, clock) = memory_log(1_000);
    for name in ["A", "B", "C"] {
        enqueue_create(&log, &clock, name);
    }
    let remote = MockRemote::new();
    remote.set_delay(Duration::from_millis(10));
    let engine = Arc::new(SyncEngine::new(log.clone(), remote.clone()));

    let a = tokio::spawn({
        let engine = engine.clone();
        async move { engine.sync_all().await.unwrap() }
    });
    let b = tokio::spawn({
        let engine = engine.clone();
        async move { engine.sync_all().await.unwrap() }
    });
    let (a, b) = (a.await.unwrap(), b.await.unwrap());

    assert_eq!(a.synced + b.synced, 3);
    assert_eq!(remote.calls().len(), 3);
}

#[tokio::test]
async fn runs_over_one_store_never_send_an_entry_twice() {
    let (log, store, clock) = memory_log(1_000);
    for name in ["A", "B", "C"] {
        enqueue_create(&log, &clock, name);
    }
    let other_log = Arc::new(PendingLog::with_clock(store.clone(), clock.clone()).unwrap());
    let remote = MockRemote::new();
    remote.set_delay(Duration::from_millis(10));
    let engine = SyncEngine::new(log.clone(), remote.clone());
    let other = SyncEngine::new(other_log.clone(), remote.clone());

    let (a, b) = tokio::join!(engine.sync_all(), other.sync_all());

    assert_eq!(a.unwrap().synced + b.unwrap().synced, 3);
    assert_eq!(remote.calls().len(), 3);
    assert_eq!(other_log.pending_count(), 0);
}

#[tokio::test]
async fn try_sync_all_skips_while_store_is_claimed() {
    let (log, store, clock) = memory_log(1_000);
    enqueue_create(&log, &clock, "A");
    let remote = MockRemote::new();
    let engine = SyncEngine::new(log.clone(), remote.clone());

    let held = store.try_lock_runs().unwrap();
    assert!(log.is_sync_running());
    assert!(engine.try_sync_all().await.unwrap().is_none());
    assert!(remote.calls().is_empty());

    drop(held);
    assert!(!log.is_sync_running());
    assert_eq!(engine.try_sync_all().await.unwrap().unwrap().synced, 1);
}

#[tokio::test]
async fn run_picks_up_entries_enqueued_through_other_handle() {
    let (log, store, clock) = memory_log(1_000);
    let engine = SyncEngine::new(log.clone(), MockRemote::new());
    let other_log = PendingLog::with_clock(store.clone(), clock.clone()).unwrap();
    let id = enqueue_create(&other_log, &clock, "A");

    let summary = engine.sync_all().await.unwrap();

    assert_eq!(summary.synced, 1);
    assert!(other_log.get(&id).unwrap().synced);
}

#[tokio::test]
async fn storage_failure_aborts_run() {
    let (log, store, clock) = memory_log(1_000);
    let id = enqueue_create(&log, &clock, "A");
    let remote = MockRemote::new();
    let engine = SyncEngine::new(log.clone(), remote.clone());
    store.set_fault(Some(StoreFault::Full));

    let err = engine.sync_all().await.unwrap_err();

    assert!(matches!(err, SyncError::Storage(rl_core::Error::StorageFull(_))));
    assert!(!log.get(&id).unwrap().synced);
}

#[tokio::test]
async fn delete_sends_no_payload() {
    let (log, _store, clock) = memory_log(1_000);
    enqueue_delete(&log, &clock, "p-9");
    clock.advance(1);
    log.enqueue(
        EntityType::Parcelle,
        Action::Create,
        Some(parcelle(2.5)),
        None,
    )
    .unwrap();
    let remote = MockRemote::new();
    let engine = SyncEngine::new(log.clone(), remote.clone());

    engine.sync_all().await.unwrap();

    let calls = remote.calls();
    assert_eq!(calls[0].action, Action::Delete);
    assert_eq!(calls[0].payload, None);
    assert_eq!(calls[1].entity, EntityType::Parcelle);
}
