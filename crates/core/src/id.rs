// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Local operation identifiers.
//!
//! A local id names a pending operation for its whole life. For a `create`
//! it also serves as the temporary id of the new record until the remote
//! system assigns a real one.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::entity::{Action, EntityType};

/// Prefix shared by every locally generated id.
pub const LOCAL_ID_PREFIX: &str = "local";

/// Generate an operation ID from its entity, action, creation time and a
/// per-process sequence number.
/// Format: local-{hash} where hash is first 12 hex chars of SHA256 over the inputs.
pub fn generate_id(
    entity: EntityType,
    action: Action,
    created_at: &DateTime<Utc>,
    seq: u64,
) -> String {
    let input = format!(
        "{}{}{}{}",
        entity,
        action,
        created_at.timestamp_nanos_opt().unwrap_or_default(),
        seq
    );
    let hash = Sha256::digest(input.as_bytes());
    format!("{}-{}", LOCAL_ID_PREFIX, hex::encode(&hash[..6]))
}

/// Generate a unique ID, handling collisions by appending incrementing suffix.
pub fn generate_unique_id<F>(
    entity: EntityType,
    action: Action,
    created_at: &DateTime<Utc>,
    seq: u64,
    exists: F,
) -> String
where
    F: Fn(&str) -> bool,
{
    let base_id = generate_id(entity, action, created_at, seq);

    if !exists(&base_id) {
        return base_id;
    }

    let mut suffix = 2;
    loop {
        let id = format!("{}-{}", base_id, suffix);
        if !exists(&id) {
            return id;
        }
        suffix += 1;
    }
}

/// Returns true if `id` was generated locally rather than by the remote system.
pub fn is_local_id(id: &str) -> bool {
    id.strip_prefix(LOCAL_ID_PREFIX)
        .is_some_and(|rest| rest.starts_with('-'))
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
