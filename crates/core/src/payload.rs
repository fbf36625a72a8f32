// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Typed domain payloads carried by pending operations.
//!
//! Every field is optional so that one struct serves both a full record
//! (create) and a partial record (update). Fields the model does not know
//! about are kept in `extra` so a payload reaches the remote API unmodified.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entity::EntityType;
use crate::error::Result;

/// A producer registered with an organisation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Producteur {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nom_complet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_naissance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub village_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A plot farmed by a producer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parcelle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producteur_id: Option<String>,
    /// Area in hectares.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superficie: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub culture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annee_creation: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A collection operation recorded at a buying point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_operation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campagne: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_operation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producteur_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parcelle_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    /// Net weight in kilograms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poids_net: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prix_unitaire: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub montant: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A field agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nom_complet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A cooperative or other producer organisation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Organisation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sigle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_organisation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localite: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A section of an organisation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A village attached to a section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Village {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departement: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payload of a pending operation, keyed by entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entity_type", content = "data", rename_all = "snake_case")]
pub enum EntityPayload {
    Operation(Operation),
    Producteur(Producteur),
    Parcelle(Parcelle),
    Agent(Agent),
    Organisation(Organisation),
    Section(Section),
    Village(Village),
}

impl EntityPayload {
    /// Builds the payload variant for `entity` from an untyped JSON object.
    pub fn from_json(entity: EntityType, data: Value) -> Result<Self> {
        let payload = match entity {
            EntityType::Operation => EntityPayload::Operation(serde_json::from_value(data)?),
            EntityType::Producteur => EntityPayload::Producteur(serde_json::from_value(data)?),
            EntityType::Parcelle => EntityPayload::Parcelle(serde_json::from_value(data)?),
            EntityType::Agent => EntityPayload::Agent(serde_json::from_value(data)?),
            EntityType::Organisation => {
                EntityPayload::Organisation(serde_json::from_value(data)?)
            }
            EntityType::Section => EntityPayload::Section(serde_json::from_value(data)?),
            EntityType::Village => EntityPayload::Village(serde_json::from_value(data)?),
        };
        Ok(payload)
    }

    /// Returns the entity type this payload belongs to.
    pub fn entity_type(&self) -> EntityType {
        match self {
            EntityPayload::Operation(_) => EntityType::Operation,
            EntityPayload::Producteur(_) => EntityType::Producteur,
            EntityPayload::Parcelle(_) => EntityType::Parcelle,
            EntityPayload::Agent(_) => EntityType::Agent,
            EntityPayload::Organisation(_) => EntityType::Organisation,
            EntityPayload::Section(_) => EntityType::Section,
            EntityPayload::Village(_) => EntityType::Village,
        }
    }

    /// Returns the record body as sent to the remote API.
    pub fn to_json(&self) -> Result<Value> {
        let value = match self {
            EntityPayload::Operation(r) => serde_json::to_value(r)?,
            EntityPayload::Producteur(r) => serde_json::to_value(r)?,
            EntityPayload::Parcelle(r) => serde_json::to_value(r)?,
            EntityPayload::Agent(r) => serde_json::to_value(r)?,
            EntityPayload::Organisation(r) => serde_json::to_value(r)?,
            EntityPayload::Section(r) => serde_json::to_value(r)?,
            EntityPayload::Village(r) => serde_json::to_value(r)?,
        };
        Ok(value)
    }

    /// Short human-readable label for listings, if the record has one.
    pub fn label(&self) -> Option<&str> {
        match self {
            EntityPayload::Producteur(r) => r.nom_complet.as_deref().or(r.code.as_deref()),
            EntityPayload::Agent(r) => r.nom_complet.as_deref(),
            EntityPayload::Parcelle(r) => r.code.as_deref(),
            EntityPayload::Operation(r) => r.type_operation.as_deref(),
            EntityPayload::Organisation(r) => r.nom.as_deref().or(r.sigle.as_deref()),
            EntityPayload::Section(r) => r.nom.as_deref().or(r.code.as_deref()),
            EntityPayload::Village(r) => r.nom.as_deref(),
        }
    }
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
