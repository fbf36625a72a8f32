// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use crate::config::{get_store_dir, init_work_dir, Config};
use crate::error::Result;

pub fn run(remote: String, store_dir: Option<String>, path: Option<String>) -> Result<()> {
    let target_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };

    let work_dir = init_work_dir(&target_path, &remote, store_dir.as_deref())?;
    let config = Config::load(&work_dir)?;

    println!("Initialized relais at {}", work_dir.display());
    println!("Remote: {}", config.remote.url);
    println!("Store: {}", get_store_dir(&work_dir, &config).display());

    Ok(())
}
