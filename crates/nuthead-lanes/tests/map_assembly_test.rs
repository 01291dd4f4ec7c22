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

use anyhow::Result;
use nuthead_core::asset::{ResourceId, ResourceKind, ResourcePayload, ResourceStatus};
use nuthead_core::error::{AssemblyError, LoadError, TransportError};
use nuthead_core::map::MapStatus;
use nuthead_data::assets::ResourceRegistry;
use nuthead_lanes::MapAssemblyLane;
use serde_json::{json, Value};

fn load_json(registry: &ResourceRegistry, id: ResourceId, document: Value) {
    let (record, _) = registry.get_or_create(id);
    record.begin_loading("memory");
    record.complete(ResourcePayload::Json(document));
}

fn map_id(name: &str) -> ResourceId {
    ResourceId::json(ResourceKind::Map, name)
}

fn flower_id() -> ResourceId {
    ResourceId::json(ResourceKind::Entity, "flower").with_variant("blue")
}

#[test]
fn create_map_keeps_metadata_and_placements() -> Result<()> {
    let registry = ResourceRegistry::new();
    load_json(
        &registry,
        map_id("test"),
        json!({
            "width": 20,
            "height": 10,
            "entities": [{ "name": "flower", "variant": "blue", "posX": 10, "posY": 20 }]
        }),
    );
    let record = registry.find(&map_id("test")).unwrap();

    let map = MapAssemblyLane::new().create_map(&record, Some("night".into()))?;

    assert_eq!(map.name, "test");
    assert_eq!(map.variant.as_deref(), Some("night"));
    assert_eq!(map.status, MapStatus::DefinitionLoaded);
    assert_eq!(map.metadata.get("width"), Some(&json!(20)));
    assert_eq!(map.entities.len(), 1);
    assert_eq!(map.entities[0].fields.pos_x(), Some(10.0));
    Ok(())
}

#[test]
fn create_map_requires_a_loaded_record() {
    let registry = ResourceRegistry::new();
    let (record, _) = registry.get_or_create(map_id("test"));
    record.begin_loading("memory");

    let err = MapAssemblyLane::new().create_map(&record, None).unwrap_err();
    assert_eq!(
        err,
        AssemblyError::MissingResource {
            id: map_id("test"),
            status: ResourceStatus::Loading,
        }
    );

    record.fail(LoadError::Transport(TransportError::new("memory", "gone")));
    let err = MapAssemblyLane::new().create_map(&record, None).unwrap_err();
    assert!(matches!(
        err,
        AssemblyError::MissingResource {
            status: ResourceStatus::Failed,
            ..
        }
    ));
}

#[test]
fn create_map_rejects_other_kinds() {
    let registry = ResourceRegistry::new();
    load_json(&registry, flower_id(), json!({ "views": {} }));
    let record = registry.find(&flower_id()).unwrap();

    let err = MapAssemblyLane::new().create_map(&record, None).unwrap_err();
    assert_eq!(err, AssemblyError::KindMismatch { id: flower_id() });

    let (image, _) = registry.get_or_create(ResourceId::image(ResourceKind::Map, "test"));
    let err = MapAssemblyLane::new().create_map(&image, None).unwrap_err();
    assert!(matches!(err, AssemblyError::KindMismatch { .. }));
}

#[test]
fn create_map_rejects_malformed_documents() {
    let registry = ResourceRegistry::new();
    load_json(&registry, map_id("list"), json!([1, 2, 3]));
    load_json(&registry, map_id("bad"), json!({ "entities": "flower" }));
    load_json(&registry, map_id("nameless"), json!({ "entities": [{ "posX": 1 }] }));
    load_json(&registry, map_id("scalar"), json!({ "entities": [3] }));
    let lane = MapAssemblyLane::new();

    for name in ["list", "bad", "nameless", "scalar"] {
        let record = registry.find(&map_id(name)).unwrap();
        let err = lane.create_map(&record, None).unwrap_err();
        assert!(
            matches!(err, AssemblyError::InvalidDefinition { .. }),
            "{name}: {err}"
        );
    }
}

#[test]
fn create_map_does_not_touch_the_record() -> Result<()> {
    let registry = ResourceRegistry::new();
    let document = json!({ "entities": [{ "name": "flower" }], "name": "ignored" });
    load_json(&registry, map_id("test"), document.clone());
    let record = registry.find(&map_id("test")).unwrap();

    let mut map = MapAssemblyLane::new().create_map(&record, None)?;
    map.entities.clear();
    map.metadata.insert("width".into(), json!(1));

    assert_eq!(record.payload().unwrap().as_json(), Some(&document));
    Ok(())
}

#[test]
fn inject_merges_shared_definition_under_placement() -> Result<()> {
    let registry = ResourceRegistry::new();
    load_json(
        &registry,
        map_id("test"),
        json!({ "entities": [
            { "name": "flower", "variant": "blue", "posX": 10, "posY": 20, "b": 3, "c": 4 }
        ] }),
    );
    load_json(
        &registry,
        flower_id(),
        json!({ "posX": 1, "label": "Flower", "views": { "idle": [0, 1] }, "a": 1, "b": 2 }),
    );
    let lane = MapAssemblyLane::new();
    let record = registry.find(&map_id("test")).unwrap();
    let mut map = lane.create_map(&record, None)?;

    lane.inject_entities(&registry, &mut map);

    assert_eq!(map.status, MapStatus::EntitiesInjected);
    let placement = serde_json::to_value(&map.entities[0])?;
    assert_eq!(
        placement,
        json!({
            "name": "flower",
            "variant": "blue",
            "label": "Flower",
            "posX": 10,
            "posY": 20,
            "views": { "idle": [0, 1] },
            "a": 1,
            "b": 3,
            "c": 4
        })
    );
    Ok(())
}

#[test]
fn inject_without_definition_keeps_placement_fields() -> Result<()> {
    let registry = ResourceRegistry::new();
    load_json(
        &registry,
        map_id("test"),
        json!({ "entities": [{ "name": "rock", "posX": 5 }, { "name": "flower", "variant": "blue" }] }),
    );
    // Present but never loaded.
    registry.get_or_create(flower_id());
    let lane = MapAssemblyLane::new();
    let record = registry.find(&map_id("test")).unwrap();
    let mut map = lane.create_map(&record, None)?;

    lane.inject_entities(&registry, &mut map);

    assert!(map.is_resolved());
    assert_eq!(map.entities[0].fields.pos_x(), Some(5.0));
    assert_eq!(map.entities[1].fields, Default::default());
    Ok(())
}

#[test]
fn inject_is_idempotent() -> Result<()> {
    let registry = ResourceRegistry::new();
    load_json(
        &registry,
        map_id("test"),
        json!({ "entities": [{ "name": "flower", "variant": "blue", "posX": 10 }] }),
    );
    load_json(&registry, flower_id(), json!({ "posX": 1, "frame": 2 }));
    let lane = MapAssemblyLane::new();
    let record = registry.find(&map_id("test")).unwrap();
    let mut map = lane.create_map(&record, None)?;

    lane.inject_entities(&registry, &mut map);
    let once = map.clone();
    lane.inject_entities(&registry, &mut map);

    assert_eq!(map, once);
    assert_eq!(map.entities[0].fields.frame(), Some(2));
    Ok(())
}

#[test]
fn create_map_accepts_values_of_any_type() -> Result<()> {
    let registry = ResourceRegistry::new();
    load_json(
        &registry,
        map_id("test"),
        json!({ "entities": [{ "name": "rock", "posX": "10", "frame": -1 }] }),
    );
    let record = registry.find(&map_id("test")).unwrap();

    let map = MapAssemblyLane::new().create_map(&record, None)?;

    let rock = &map.entities[0].fields;
    assert_eq!(rock.pos_x(), None);
    assert_eq!(rock.get("posX"), Some(&json!("10")));
    assert_eq!(rock.get("frame"), Some(&json!(-1)));
    Ok(())
}

#[test]
fn inject_keeps_definitions_with_off_type_values() -> Result<()> {
    let registry = ResourceRegistry::new();
    load_json(
        &registry,
        map_id("test"),
        json!({ "entities": [{ "name": "flower", "variant": "blue", "posX": 10 }] }),
    );
    load_json(
        &registry,
        flower_id(),
        json!({ "view": 7, "label": "Flower", "views": { "idle": [0] } }),
    );
    let lane = MapAssemblyLane::new();
    let record = registry.find(&map_id("test")).unwrap();
    let mut map = lane.create_map(&record, None)?;

    lane.inject_entities(&registry, &mut map);

    let flower = &map.entities[0].fields;
    assert_eq!(flower.label(), Some("Flower"));
    assert_eq!(flower.view(), None);
    assert_eq!(flower.get("view"), Some(&json!(7)));
    assert!(flower.views().is_some());
    Ok(())
}

#[test]
fn inject_ignores_definitions_that_are_not_objects() -> Result<()> {
    let registry = ResourceRegistry::new();
    load_json(
        &registry,
        map_id("test"),
        json!({ "entities": [{ "name": "flower", "variant": "blue", "posX": 10 }] }),
    );
    load_json(&registry, flower_id(), json!(["idle"]));
    let lane = MapAssemblyLane::new();
    let record = registry.find(&map_id("test")).unwrap();
    let mut map = lane.create_map(&record, None)?;

    lane.inject_entities(&registry, &mut map);

    assert!(map.is_resolved());
    assert_eq!(
        serde_json::to_value(&map.entities[0])?,
        json!({ "name": "flower", "variant": "blue", "posX": 10 })
    );
    Ok(())
}
