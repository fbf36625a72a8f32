// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod clean;
pub mod clear;
pub mod delete;
pub mod enqueue;
pub mod export;
pub mod init;
pub mod list;
pub mod status;
pub mod sync;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use rl_core::{FileStore, PendingLog};

use crate::config::{find_work_dir, get_store_dir, Config};
use crate::error::{Error, Result};
use crate::sync::HttpRemote;

/// Helper to open the pending log from the current context.
pub fn open_log() -> Result<(Arc<PendingLog>, Config, PathBuf)> {
    let work_dir = find_work_dir()?;
    let config = Config::load(&work_dir)?;
    let store = FileStore::open(&get_store_dir(&work_dir, &config))?;
    let log = PendingLog::open(store)?;
    Ok((Arc::new(log), config, work_dir))
}

/// Helper to build the HTTP client for the configured remote.
pub fn open_remote(config: &Config) -> Result<HttpRemote> {
    HttpRemote::new(&config.remote.url, config.remote.timeout())
}

/// Helper to build the async runtime for commands that talk to the network.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Error::Io(std::io::Error::other(format!("tokio: {}", e))))
}
