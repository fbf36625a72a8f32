// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use rl_core::{Action, EntityPayload, EntityType, PendingLog};
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::{Error, Result};

use super::open_log;

pub fn run(
    entity: EntityType,
    action: Action,
    target: Option<String>,
    data: Option<String>,
    output: OutputFormat,
) -> Result<()> {
    let (log, _, _) = open_log()?;
    let id = run_impl(&log, entity, action, target, data.as_deref())?;

    match output {
        OutputFormat::Text => println!("{}", id),
        OutputFormat::Json => {
            let out = serde_json::json!({
                "id": id,
                "entity_type": entity,
                "action": action,
            });
            println!("{}", serde_json::to_string(&out)?);
        }
    }
    Ok(())
}

/// Internal implementation that accepts the log for testing.
pub(crate) fn run_impl(
    log: &PendingLog,
    entity: EntityType,
    action: Action,
    target: Option<String>,
    data: Option<&str>,
) -> Result<String> {
    let payload = parse_payload(entity, data)?;
    let target = target.map(|t| t.trim().to_string());
    log.enqueue(entity, action, payload, target)
        .map_err(|e| if e.is_storage() { Error::NotSaved(e) } else { e.into() })
}

/// Parses `--data` into a typed payload for `entity`.
pub(crate) fn parse_payload(entity: EntityType, data: Option<&str>) -> Result<Option<EntityPayload>> {
    let Some(text) = data else {
        return Ok(None);
    };
    let value: Value = serde_json::from_str(text).map_err(|e| Error::InvalidPayloadJson {
        reason: e.to_string(),
    })?;
    if !value.is_object() {
        return Err(Error::InvalidPayloadJson {
            reason: "expected a JSON object".to_string(),
        });
    }
    Ok(Some(EntityPayload::from_json(entity, value)?))
}

#[cfg(test)]
#[path = "enqueue_tests.rs"]
mod tests;
