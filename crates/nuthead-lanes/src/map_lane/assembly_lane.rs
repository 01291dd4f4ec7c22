// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Two-phase map assembly.
//!
//! Phase one, [`MapAssemblyLane::create_map`], turns a loaded map definition
//! into a [`Map`] whose placements only know what the map file says. Phase two,
//! [`MapAssemblyLane::inject_entities`], merges each entity's shared definition
//! under its placements once those definitions have loaded.

use nuthead_core::asset::{
    AssetFormat, ResourceId, ResourceKind, ResourceRecord, ResourceStatus,
};
use nuthead_core::error::AssemblyError;
use nuthead_core::map::{EntityFields, Map, MapDefinition, MapStatus};
use nuthead_data::assets::ResourceRegistry;
use serde_json::Value;

/// Builds maps out of loaded records.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapAssemblyLane;

impl MapAssemblyLane {
    /// Creates a new assembly lane.
    pub fn new() -> Self {
        Self
    }

    /// Builds a map in `DefinitionLoaded` status from a loaded `(json, map)`
    /// record.
    ///
    /// The record's payload is copied, never modified, so the same record can
    /// back any number of maps.
    ///
    /// # Errors
    ///
    /// - [`AssemblyError::KindMismatch`] if the record is not a JSON map record.
    /// - [`AssemblyError::MissingResource`] if the record has not loaded.
    /// - [`AssemblyError::InvalidDefinition`] if the document is not an object
    ///   or `entities` is not a list of objects each with a string `name`.
    ///   Other values are not checked.
    pub fn create_map(
        &self,
        record: &ResourceRecord,
        variant: Option<String>,
    ) -> Result<Map, AssemblyError> {
        let id = record.id();
        if id.format != AssetFormat::Json || id.kind != ResourceKind::Map {
            return Err(AssemblyError::KindMismatch { id: id.clone() });
        }

        let status = record.status();
        let payload = match (status, record.payload()) {
            (ResourceStatus::Loaded, Some(payload)) => payload,
            _ => {
                return Err(AssemblyError::MissingResource {
                    id: id.clone(),
                    status,
                })
            }
        };

        let invalid = |reason: String| AssemblyError::InvalidDefinition {
            id: id.clone(),
            reason,
        };
        let document = match payload.as_json() {
            Some(document @ Value::Object(_)) => document.clone(),
            _ => return Err(invalid("expected a JSON object".to_owned())),
        };
        let definition: MapDefinition =
            serde_json::from_value(document).map_err(|e| invalid(e.to_string()))?;

        log::debug!(
            "Created map '{}' with {} placements",
            id.name,
            definition.entities.len()
        );
        Ok(Map::from_definition(id.name.clone(), variant, definition))
    }

    /// Merges every placement over its entity's shared definition and marks the
    /// map `EntitiesInjected`.
    ///
    /// Definitions are looked up in `registry` by `(json, entity, name,
    /// variant)`. A definition that is absent, not loaded, or not a JSON object
    /// contributes no fields; the placement keeps its own. Calling this
    /// on a map that is already injected does nothing.
    pub fn inject_entities(&self, registry: &ResourceRegistry, map: &mut Map) {
        if map.status != MapStatus::DefinitionLoaded {
            return;
        }

        for placement in &mut map.entities {
            let id = ResourceId::json(ResourceKind::Entity, placement.name.clone())
                .with_optional_variant(placement.variant.clone());
            placement.apply_definition(shared_definition(registry, &id));
        }

        map.status = MapStatus::EntitiesInjected;
        log::debug!("Injected {} entities into map '{}'", map.entities.len(), map.name);
    }
}

fn shared_definition(registry: &ResourceRegistry, id: &ResourceId) -> EntityFields {
    let Some(record) = registry.find(id) else {
        return EntityFields::default();
    };
    let Some(document) = record.payload().and_then(|p| p.as_json().cloned()) else {
        return EntityFields::default();
    };

    serde_json::from_value(document).unwrap_or_else(|e| {
        log::warn!("Ignoring entity definition {id}, not an object: {e}");
        EntityFields::default()
    })
}
