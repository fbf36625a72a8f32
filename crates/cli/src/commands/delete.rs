// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::Result;

use super::open_log;

pub fn run(id: &str) -> Result<()> {
    let (log, _, _) = open_log()?;
    let op = log.remove(id)?;
    println!("Deleted {}", op.id);
    if !op.synced {
        eprintln!("warning: {} was never synced; its change is lost", op.id);
    }
    Ok(())
}
