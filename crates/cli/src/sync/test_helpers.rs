// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rl_core::payload::{Parcelle, Producteur};
use rl_core::{Action, EntityPayload, EntityType, ManualClock, MemoryStore, PendingLog};

use super::remote::{RemoteApi, RemoteError, RemoteRecord, RemoteResult};

/// One call received by [`MockRemote`].
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCall {
    pub action: Action,
    pub entity: EntityType,
    /// Remote id for update and delete.
    pub id: Option<String>,
    pub payload: Option<EntityPayload>,
}

#[derive(Default)]
struct MockState {
    offline: bool,
    delay: Option<Duration>,
    /// Outcomes for the next calls, in order. `None` means success.
    script: VecDeque<Option<RemoteError>>,
    /// Errors returned for every call addressing a given remote id.
    sticky: HashMap<String, RemoteError>,
    calls: Vec<RemoteCall>,
    next_id: u64,
}

/// Scripted in-process remote.
///
/// Creates succeed with ids `srv-1`, `srv-2`, ... unless a failure is
/// scripted. Clones share state, so a test can keep a handle after moving
/// one into the engine.
#[derive(Clone, Default)]
pub struct MockRemote {
    state: Arc<Mutex<MockState>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call fail with a connectivity error.
    pub fn set_offline(&self, offline: bool) {
        self.state.lock().unwrap().offline = offline;
    }

    /// Delays every call.
    pub fn set_delay(&self, delay: Duration) {
        self.state.lock().unwrap().delay = Some(delay);
    }

    /// Queues the outcomes of the next calls. `None` is a success.
    pub fn script(&self, outcomes: impl IntoIterator<Item = Option<RemoteError>>) {
        self.state.lock().unwrap().script.extend(outcomes);
    }

    /// Fails every call addressing `id` with `err`.
    pub fn fail_for(&self, id: &str, err: RemoteError) {
        self.state.lock().unwrap().sticky.insert(id.to_string(), err);
    }

    /// Stops failing calls for `id`.
    pub fn clear_failure(&self, id: &str) {
        self.state.lock().unwrap().sticky.remove(id);
    }

    /// Returns every call received so far.
    pub fn calls(&self) -> Vec<RemoteCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Returns the calls made with `action`.
    pub fn calls_for(&self, action: Action) -> Vec<RemoteCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.action == action)
            .collect()
    }

    fn record(&self, call: RemoteCall) -> (Option<Duration>, RemoteResult<Option<String>>) {
        let mut state = self.state.lock().unwrap();
        let delay = state.delay;
        let sticky = call.id.as_ref().and_then(|id| state.sticky.get(id).cloned());
        let action = call.action;
        state.calls.push(call);

        if state.offline {
            return (delay, Err(RemoteError::Connectivity("network unreachable".into())));
        }
        if let Some(err) = sticky {
            return (delay, Err(err));
        }
        if let Some(Some(err)) = state.script.pop_front() {
            return (delay, Err(err));
        }
        if action == Action::Create {
            state.next_id += 1;
            return (delay, Ok(Some(format!("srv-{}", state.next_id))));
        }
        (delay, Ok(None))
    }
}

async fn pause(delay: Option<Duration>) {
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

impl RemoteApi for MockRemote {
    fn create<'a>(
        &'a self,
        entity: EntityType,
        payload: &'a EntityPayload,
    ) -> Pin<Box<dyn Future<Output = RemoteResult<RemoteRecord>> + Send + 'a>> {
        let (delay, result) = self.record(RemoteCall {
            action: Action::Create,
            entity,
            id: None,
            payload: Some(payload.clone()),
        });
        Box::pin(async move {
            pause(delay).await;
            let id = result?;
            Ok(RemoteRecord::from_body(serde_json::json!({ "id": id })))
        })
    }

    fn update<'a>(
        &'a self,
        entity: EntityType,
        id: &'a str,
        payload: &'a EntityPayload,
    ) -> Pin<Box<dyn Future<Output = RemoteResult<RemoteRecord>> + Send + 'a>> {
        let (delay, result) = self.record(RemoteCall {
            action: Action::Update,
            entity,
            id: Some(id.to_string()),
            payload: Some(payload.clone()),
        });
        Box::pin(async move {
            pause(delay).await;
            result?;
            Ok(RemoteRecord::from_body(serde_json::json!({ "id": id })))
        })
    }

    fn delete<'a>(
        &'a self,
        entity: EntityType,
        id: &'a str,
    ) -> Pin<Box<dyn Future<Output = RemoteResult<()>> + Send + 'a>> {
        let (delay, result) = self.record(RemoteCall {
            action: Action::Delete,
            entity,
            id: Some(id.to_string()),
            payload: None,
        });
        Box::pin(async move {
            pause(delay).await;
            result.map(|_| ())
        })
    }
}

/// Opens an in-memory log with a manual clock starting at `start_ms`.
pub fn memory_log(start_ms: i64) -> (Arc<PendingLog>, MemoryStore, Arc<ManualClock>) {
    let store = MemoryStore::new();
    let clock = Arc::new(ManualClock::at_millis(start_ms));
    let log = PendingLog::with_clock(store.clone(), clock.clone()).unwrap();
    (Arc::new(log), store, clock)
}

/// Producer payload with the given full name.
pub fn producteur(nom: &str) -> EntityPayload {
    EntityPayload::Producteur(Producteur {
        nom_complet: Some(nom.to_string()),
        ..Default::default()
    })
}

/// Plot payload with the given area.
pub fn parcelle(superficie: f64) -> EntityPayload {
    EntityPayload::Parcelle(Parcelle {
        superficie: Some(superficie),
        ..Default::default()
    })
}

/// Enqueues a producer create, advancing the clock so entries get distinct
/// timestamps.
pub fn enqueue_create(log: &PendingLog, clock: &ManualClock, nom: &str) -> String {
    clock.advance(1);
    log.enqueue(EntityType::Producteur, Action::Create, Some(producteur(nom)), None)
        .unwrap()
}

/// Enqueues a producer update of `target`.
pub fn enqueue_update(log: &PendingLog, clock: &ManualClock, target: &str, nom: &str) -> String {
    clock.advance(1);
    log.enqueue(
        EntityType::Producteur,
        Action::Update,
        Some(producteur(nom)),
        Some(target.to_string()),
    )
    .unwrap()
}

/// Enqueues a producer delete of `target`.
pub fn enqueue_delete(log: &PendingLog, clock: &ManualClock, target: &str) -> String {
    clock.advance(1);
    log.enqueue(EntityType::Producteur, Action::Delete, None, Some(target.to_string()))
        .unwrap()
}
