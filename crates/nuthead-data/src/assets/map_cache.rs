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

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use nuthead_core::map::Map;

type MapKey = (String, Option<String>);

/// Resolved maps keyed by `(name, variant)`.
///
/// Cached maps are shared as `Arc<Map>`; callers never mutate them.
#[derive(Debug, Default)]
pub struct MapCache {
    maps: RwLock<HashMap<MapKey, Arc<Map>>>,
}

impl MapCache {
    /// Creates a new, empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached map for `(name, variant)`, if any.
    pub fn get(&self, name: &str, variant: Option<&str>) -> Option<Arc<Map>> {
        let maps = self.maps.read().unwrap_or_else(PoisonError::into_inner);
        maps.get(&(name.to_owned(), variant.map(str::to_owned)))
            .cloned()
    }

    /// Stores `map` under its own name and variant and returns the shared handle.
    ///
    /// If another caller cached the same map first, its handle is kept and
    /// returned instead.
    pub fn insert(&self, map: Map) -> Arc<Map> {
        let key = (map.name.clone(), map.variant.clone());
        let mut maps = self.maps.write().unwrap_or_else(PoisonError::into_inner);
        maps.entry(key).or_insert_with(|| Arc::new(map)).clone()
    }

    /// Checks if a map is cached.
    pub fn contains(&self, name: &str, variant: Option<&str>) -> bool {
        self.get(name, variant).is_some()
    }

    /// The number of cached maps.
    pub fn len(&self) -> usize {
        self.maps
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
