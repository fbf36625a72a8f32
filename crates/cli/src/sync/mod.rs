// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Synchronization of the pending log with the remote system of record.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Engine    │────►│  RemoteApi  │────►│   Remote    │
//! │ (SyncEngine)│◄────│   (trait)   │◄────│   Server    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!     ▲      │
//!     │      ▼
//!     │  ┌─────────────┐
//!     │  │ PendingLog  │  (durable queue)
//!     │  └─────────────┘
//!     │
//! ┌─────────────┐
//! │Connectivity │  (offline → online triggers a run)
//! │  Monitor    │
//! └─────────────┘
//! ```
//!
//! # Features
//!
//! - One remote request at a time, oldest entry first
//! - Per-entry failure isolation, no entry aborts a run
//! - Updates and deletes wait for the create of their record
//! - Single-flight runs shared by manual and automatic triggers
//! - Injectable remote trait for testing

mod connectivity;
mod engine;
mod http;
mod remote;
mod service;

pub use connectivity::{
    poll_reachability, spawn_auto_sync, ConnectivityMonitor, ReachabilityProbe, TcpProbe,
};
pub use engine::{FailedEntry, SyncEngine, SyncError, SyncRunSummary};
pub use http::{classify_status, parse_base_url, HttpRemote};
pub use remote::{RemoteApi, RemoteError, RemoteRecord, RemoteResult};
pub use service::OfflineSync;

#[cfg(test)]
pub(crate) mod test_helpers;


#[cfg(test)]
mod engine_tests;


#[cfg(test)]
mod service_tests;
