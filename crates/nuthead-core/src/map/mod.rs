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

//! The in-memory scene description produced by the pipeline.
//!
//! A [`Map`] starts life in [`MapStatus::DefinitionLoaded`], holding only what
//! the map file itself says about each [`EntityPlacement`]. Once every entity's
//! shared definition has loaded, the definitions are merged under the
//! placements and the map moves to [`MapStatus::EntitiesInjected`].

mod entity;

pub use entity::*;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value};

/// How far a [`Map`] has been assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MapStatus {
    /// Built from the map file; placements carry placement-level fields only.
    DefinitionLoaded,
    /// Every placement carries its merged entity definition.
    EntitiesInjected,
}

/// The wire shape of a map definition file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapDefinition {
    /// Ordered entity placements.
    #[serde(default)]
    pub entities: Vec<EntityPlacement>,
    /// Everything else the designer wrote (dimensions, margins, ...).
    #[serde(flatten)]
    pub metadata: JsonMap<String, Value>,
}

/// A resolved or partially resolved map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Map {
    /// The map's name.
    pub name: String,
    /// The map's variant, which selects its background image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// Assembly progress.
    pub status: MapStatus,
    /// Designer-authored metadata, in file order.
    #[serde(flatten)]
    pub metadata: JsonMap<String, Value>,
    /// Ordered entity placements.
    pub entities: Vec<EntityPlacement>,
}

impl Map {
    /// Builds a map in `DefinitionLoaded` status from a parsed definition.
    ///
    /// `name`, `variant` and `status` keys found in the metadata are dropped in
    /// favor of the values passed here.
    pub fn from_definition(
        name: impl Into<String>,
        variant: Option<String>,
        definition: MapDefinition,
    ) -> Self {
        let mut metadata = definition.metadata;
        for reserved in ["name", "variant", "status"] {
            metadata.remove(reserved);
        }

        Self {
            name: name.into(),
            variant,
            status: MapStatus::DefinitionLoaded,
            metadata,
            entities: definition.entities,
        }
    }

    /// Every distinct `(name, variant)` pair referenced by the placements, in
    /// first-seen order.
    pub fn entity_identities(&self) -> Vec<(String, Option<String>)> {
        let mut seen = HashSet::new();
        self.entities
            .iter()
            .filter(|placement| seen.insert((&placement.name, &placement.variant)))
            .map(|placement| (placement.name.clone(), placement.variant.clone()))
            .collect()
    }

    /// Returns `true` once entities have been injected.
    pub fn is_resolved(&self) -> bool {
        self.status == MapStatus::EntitiesInjected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn definition(value: Value) -> MapDefinition {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn reserved_keys_are_not_duplicated() {
        let map = Map::from_definition(
            "test",
            None,
            definition(json!({ "name": "other", "status": 9, "width": 640 })),
        );

        let value = serde_json::to_value(&map).unwrap();
        assert_eq!(value["name"], json!("test"));
        assert_eq!(value["status"], json!("definitionLoaded"));
        assert_eq!(value["width"], json!(640));
        assert_eq!(value["entities"], json!([]));
    }

    #[test]
    fn entity_identities_are_distinct_and_ordered() {
        let map = Map::from_definition(
            "test",
            None,
            definition(json!({
                "entities": [
                    { "name": "tree" },
                    { "name": "flower", "variant": "blue" },
                    { "name": "tree" },
                    { "name": "flower" },
                    { "name": "flower", "variant": "blue" }
                ]
            })),
        );

        assert_eq!(
            map.entity_identities(),
            vec![
                ("tree".to_string(), None),
                ("flower".to_string(), Some("blue".to_string())),
                ("flower".to_string(), None),
            ]
        );
    }
}
