// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration management.
//!
//! Configuration is stored in `.relais/config.toml` and includes:
//! - `store_dir`: Optional path for the pending log (defaults to `.relais/store`)
//! - `[remote]`: Base URL of the system of record and the request timeout
//! - `[connectivity]`: How often and how long to probe the remote in `watch`

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::env;
use crate::error::{Error, Result};
use crate::sync::parse_base_url;

const WORK_DIR_NAME: &str = ".relais";
const CONFIG_FILE_NAME: &str = "config.toml";
const STORE_DIR_NAME: &str = "store";
const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Project configuration stored in `.relais/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Optional path for the pending log (relative to project root or absolute).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<String>,
    pub remote: RemoteConfig,
    #[serde(default)]
    pub connectivity: ConnectivityConfig,
}

/// Remote system of record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the CRUD API (`http://` or `https://`).
    pub url: String,
    /// Per-request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Reachability probing used by `relais watch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectivityConfig {
    /// Seconds between probes (default: 15).
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,
    /// Probe connect timeout in milliseconds (default: 3000).
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        ConnectivityConfig {
            probe_interval_secs: default_probe_interval_secs(),
            probe_timeout_ms: default_probe_timeout_ms(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_probe_interval_secs() -> u64 {
    15
}

fn default_probe_timeout_ms() -> u64 {
    3_000
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ConnectivityConfig {
    /// Interval between probes, at least one second.
    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs.max(1))
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl Config {
    /// Creates a config for the given remote URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the URL is not an http(s) URL.
    pub fn new(url: &str) -> Result<Self> {
        parse_base_url(url)?;
        Ok(Config {
            store_dir: None,
            remote: RemoteConfig {
                url: url.to_string(),
                timeout_secs: default_timeout_secs(),
            },
            connectivity: ConnectivityConfig::default(),
        })
    }

    /// Loads configuration from the given `.relais/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        parse_base_url(&config.remote.url)?;
        Ok(config)
    }

    /// Saves configuration to the given `.relais/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }
}

/// Find the .relais directory from `RELAIS_DIR` or by walking up from the
/// current directory.
pub fn find_work_dir() -> Result<PathBuf> {
    if let Some(dir) = env::relais_dir() {
        if dir.is_dir() {
            return Ok(dir);
        }
        return Err(Error::NotInitialized);
    }

    let mut current = std::env::current_dir()?;
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.is_dir() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Get the pending log directory from config
pub fn get_store_dir(work_dir: &Path, config: &Config) -> PathBuf {
    match &config.store_dir {
        Some(store_dir) => {
            let store_path = Path::new(store_dir);
            if store_path.is_absolute() {
                store_path.to_path_buf()
            } else {
                // Relative to work_dir's parent (the project root)
                work_dir.parent().unwrap_or(work_dir).join(store_dir)
            }
        }
        None => work_dir.join(STORE_DIR_NAME),
    }
}

/// Initialize a new .relais directory at the given path
pub fn init_work_dir(path: &Path, url: &str, store_dir: Option<&str>) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    let mut config = Config::new(url)?;
    config.store_dir = store_dir.map(String::from);

    fs::create_dir_all(&work_dir)?;
    config.save(&work_dir)?;
    fs::create_dir_all(get_store_dir(&work_dir, &config))?;
    write_gitignore(&work_dir)?;

    Ok(work_dir)
}

/// Write a .gitignore file to the work directory.
///
/// The queued operations are device-local and never committed.
pub fn write_gitignore(work_dir: &Path) -> Result<()> {
    let gitignore_path = work_dir.join(GITIGNORE_FILE_NAME);
    fs::write(
        &gitignore_path,
        "# Device-local pending operations\nstore/\n",
    )?;
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
