// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! rlrs - Offline mutation queue and synchronization engine.
//!
//! This crate provides the functionality behind the `relais` CLI: a durable
//! queue of create/update/delete intents recorded while disconnected, and an
//! engine that replays them against a remote CRUD API once it is reachable.
//!
//! # Main Components
//!
//! - [`sync::OfflineSync`] - Application facade over the queue and engine
//! - [`sync::SyncEngine`] - Drains the queue against a [`sync::RemoteApi`]
//! - [`sync::ConnectivityMonitor`] - Online state and the automatic trigger
//! - [`Config`] - Project configuration (remote URL, probing, store location)
//! - [`Error`] - Error types for all operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use rlrs::sync::{ConnectivityMonitor, HttpRemote, OfflineSync};
//!
//! let remote = HttpRemote::new("https://api.example.org/api/v1", timeout)?;
//! let service = OfflineSync::new(log, remote, ConnectivityMonitor::default());
//! let id = service.enqueue(EntityType::Producteur, Action::Create, Some(payload), None)?;
//! let summary = service.sync_all().await?;
//! ```

mod cli;
mod commands;
mod display;

pub mod config;
pub mod env;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command, ListFilter, OutputFormat};
pub use config::{find_work_dir, get_store_dir, init_work_dir, Config};
pub use error::{Error, Result};

use clap::CommandFactory;
use clap_complete::generate;

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Init {
            remote,
            store_dir,
            path,
        } => commands::init::run(remote, store_dir, path),
        Command::Enqueue {
            entity,
            action,
            target,
            data,
            output,
        } => commands::enqueue::run(entity, action, target, data, output),
        Command::List { filter, output } => commands::list::run(filter, output),
        Command::Status { probe, output } => commands::status::run(probe, output),
        Command::Sync { output } => commands::sync::run(output),
        Command::Clean => commands::clean::run(),
        Command::Clear { yes } => commands::clear::run(yes),
        Command::Delete { id } => commands::delete::run(&id),
        Command::Export { path } => commands::export::run(path.as_deref()),
        Command::Watch => commands::watch::run(),
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "relais", &mut std::io::stdout());
            Ok(())
        }
    }
}
