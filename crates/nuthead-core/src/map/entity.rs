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

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value};

/// The fields an entity carries, either in its shared definition file or in a
/// map placement.
///
/// Values are kept exactly as the designer wrote them, so numbers and unknown
/// keys survive a round trip unchanged. The well-known keys (`label`, `posX`,
/// `view`, ...) have typed accessors that return `None` when the key is absent
/// or holds a value of another type; such a value is still kept and still
/// merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityFields(JsonMap<String, Value>);

impl EntityFields {
    /// Creates an empty set of fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlays `over` on top of `self`, key by key.
    ///
    /// The merge is right-biased: a key set in `over` replaces the one in
    /// `self`, a key absent from `over` keeps `self`'s value.
    pub fn overlay(mut self, over: EntityFields) -> EntityFields {
        self.0.extend(over.0);
        self
    }

    /// The raw value of `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Sets `key`, returning its previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Iterates over every key in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// The number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no key is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Display label.
    pub fn label(&self) -> Option<&str> {
        self.text("label")
    }

    /// Horizontal position on the map.
    pub fn pos_x(&self) -> Option<f64> {
        self.number("posX")
    }

    /// Vertical position on the map.
    pub fn pos_y(&self) -> Option<f64> {
        self.number("posY")
    }

    /// Draw layer (`under`, `over`, ...).
    pub fn pos_z(&self) -> Option<&str> {
        self.text("posZ")
    }

    /// Initial view name.
    pub fn view(&self) -> Option<&str> {
        self.text("view")
    }

    /// Initial frame index within the view.
    pub fn frame(&self) -> Option<u64> {
        self.0.get("frame").and_then(Value::as_u64)
    }

    /// Rotation in degrees.
    pub fn rotate(&self) -> Option<f64> {
        self.number("rotate")
    }

    /// Whether the layer follows the vertical position.
    pub fn enable_auto_pos_z(&self) -> Option<bool> {
        self.flag("enableAutoPosZ")
    }

    /// Whether collision geometry is active.
    pub fn enable_collisions(&self) -> Option<bool> {
        self.flag("enableCollisions")
    }

    /// Mirror the sprite horizontally.
    pub fn flip_image_x(&self) -> Option<bool> {
        self.flag("flipImageX")
    }

    /// Mirror the sprite vertically.
    pub fn flip_image_y(&self) -> Option<bool> {
        self.flag("flipImageY")
    }

    /// Mirror collision geometry horizontally.
    pub fn flip_collisions_x(&self) -> Option<bool> {
        self.flag("flipCollisionsX")
    }

    /// Mirror collision geometry vertically.
    pub fn flip_collisions_y(&self) -> Option<bool> {
        self.flag("flipCollisionsY")
    }

    /// Frame defaults applied to every view frame.
    pub fn defaults(&self) -> Option<&JsonMap<String, Value>> {
        self.0.get("defaults").and_then(Value::as_object)
    }

    /// Named views, each a list of frames.
    pub fn views(&self) -> Option<&JsonMap<String, Value>> {
        self.0.get("views").and_then(Value::as_object)
    }

    /// Attached interaction points.
    pub fn nuts(&self) -> Option<&Vec<Value>> {
        self.0.get("nuts").and_then(Value::as_array)
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    fn number(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    fn flag(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }
}

impl From<JsonMap<String, Value>> for EntityFields {
    fn from(fields: JsonMap<String, Value>) -> Self {
        Self(fields)
    }
}

/// One occurrence of an entity on a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityPlacement {
    /// The entity's name, used to find its shared definition.
    pub name: String,
    /// The entity's variant, used for both its definition and its sprite.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// Placement-level fields, later merged over the shared definition.
    #[serde(flatten)]
    pub fields: EntityFields,
}

impl EntityPlacement {
    /// Creates a placement with no fields besides its identity.
    pub fn new(name: impl Into<String>, variant: Option<String>) -> Self {
        Self {
            name: name.into(),
            variant,
            fields: EntityFields::default(),
        }
    }

    /// Merges a shared definition under this placement's own fields.
    ///
    /// `name` and `variant` keys found in the shared definition are dropped so
    /// they can never shadow the placement's identity.
    pub fn apply_definition(&mut self, mut shared: EntityFields) {
        shared.remove("name");
        shared.remove("variant");
        let own = std::mem::take(&mut self.fields);
        self.fields = shared.overlay(own);
    }
}
