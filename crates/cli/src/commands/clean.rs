// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::Result;

use super::open_log;

pub fn run() -> Result<()> {
    let (log, _, _) = open_log()?;
    let removed = log.remove_synced()?;
    match removed {
        0 => println!("No synced operations to remove"),
        1 => println!("Removed 1 synced operation"),
        n => println!("Removed {} synced operations", n),
    }
    Ok(())
}
