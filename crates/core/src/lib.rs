// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! rl-core: Shared library for the relais offline mutation queue
//!
//! This crate provides the data model and durable storage used by the
//! synchronization engine: entity kinds and typed payloads, the pending
//! operation record, the key-addressed store and the pending log built on it.
//! Nothing here talks to the network.

pub mod clock;
pub mod entity;
pub mod error;
pub mod export;
pub mod id;
pub mod jsonl;
pub mod log;
pub mod payload;
pub mod pending;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entity::{Action, EntityType};
pub use error::{Error, Result};
pub use export::ExportSnapshot;
pub use log::PendingLog;
pub use payload::{
    Agent, EntityPayload, Operation, Organisation, Parcelle, Producteur, Section, Village,
};
pub use pending::{FailureKind, OperationPatch, PendingOperation, SyncFailure};
pub use store::{DurableStore, FileStore, MemoryStore, RunLock, StoreFault};
