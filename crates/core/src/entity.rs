// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Entity kinds and mutation actions.
//!
//! Every pending operation targets exactly one entity type, and every entity
//! type maps onto exactly one remote collection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Domain kind of record a pending operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// A collection operation (cocoa purchase/weighing at a collection point).
    Operation,
    /// A registered producer.
    Producteur,
    /// A plot farmed by a producer.
    Parcelle,
    /// A field agent.
    Agent,
    /// A cooperative or other organisation.
    Organisation,
    /// A section of an organisation.
    Section,
    /// A village.
    Village,
}

impl EntityType {
    /// All entity types, in display order.
    pub const ALL: [EntityType; 7] = [
        EntityType::Operation,
        EntityType::Producteur,
        EntityType::Parcelle,
        EntityType::Agent,
        EntityType::Organisation,
        EntityType::Section,
        EntityType::Village,
    ];

    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Operation => "operation",
            EntityType::Producteur => "producteur",
            EntityType::Parcelle => "parcelle",
            EntityType::Agent => "agent",
            EntityType::Organisation => "organisation",
            EntityType::Section => "section",
            EntityType::Village => "village",
        }
    }

    /// Returns the name of the remote collection backing this entity type.
    pub fn collection(&self) -> &'static str {
        match self {
            EntityType::Operation => "operations",
            EntityType::Producteur => "producteurs",
            EntityType::Parcelle => "parcelles",
            EntityType::Agent => "agents",
            EntityType::Organisation => "organisations",
            EntityType::Section => "sections",
            EntityType::Village => "villages",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "operation" => Ok(EntityType::Operation),
            "producteur" => Ok(EntityType::Producteur),
            "parcelle" => Ok(EntityType::Parcelle),
            "agent" => Ok(EntityType::Agent),
            "organisation" => Ok(EntityType::Organisation),
            "section" => Ok(EntityType::Section),
            "village" => Ok(EntityType::Village),
            _ => Err(Error::InvalidEntityType(s.to_string())),
        }
    }
}

/// Kind of mutation a pending operation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl Action {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    /// Returns true if the action addresses an existing record by id.
    pub fn requires_target(&self) -> bool {
        matches!(self, Action::Update | Action::Delete)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "create" => Ok(Action::Create),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            _ => Err(Error::InvalidAction(s.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "entity_tests.rs"]
mod tests;
