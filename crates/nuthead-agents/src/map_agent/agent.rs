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

//! The MapAgent loads maps and everything they reference.
//!
//! Loading runs in two phases. The map's definition and background image are
//! requested first; once both have loaded, the definition names the entities on
//! the map, and each entity's definition and sprite sheet are requested in a
//! second batch. Only when that batch has loaded are the entity definitions
//! merged into the map.

use std::sync::{Arc, PoisonError, RwLock};

use nuthead_core::asset::{ResourceId, ResourceKind, ResourceRecord};
use nuthead_core::error::{MapLoadCause, MapLoadError};
use nuthead_core::map::Map;
use nuthead_core::source::AssetSource;
use nuthead_core::telemetry::MetricsResult;
use nuthead_data::assets::{MapCache, ResourceRegistry};
use nuthead_lanes::MapAssemblyLane;
use nuthead_telemetry::MetricsRegistry;

use crate::asset_agent::{AssetFetcher, CompletionWatcher};

/// Owns the resource registry and the map cache, and runs `load_map`.
#[derive(Debug)]
pub struct MapAgent {
    registry: ResourceRegistry,
    cache: MapCache,
    fetcher: AssetFetcher,
    watcher: CompletionWatcher,
    assembler: MapAssemblyLane,
    current: RwLock<Option<Arc<Map>>>,
}

impl MapAgent {
    /// Creates an agent reading resources through `source` below `data_root`.
    pub fn new(
        source: Arc<dyn AssetSource>,
        data_root: impl Into<String>,
        metrics: &MetricsRegistry,
    ) -> MetricsResult<Self> {
        Ok(Self::with_fetcher(AssetFetcher::new(source, data_root, metrics)?))
    }

    /// Creates an agent around an existing fetcher.
    pub fn with_fetcher(fetcher: AssetFetcher) -> Self {
        Self {
            registry: ResourceRegistry::new(),
            cache: MapCache::new(),
            fetcher,
            watcher: CompletionWatcher::new(),
            assembler: MapAssemblyLane::new(),
            current: RwLock::new(None),
        }
    }

    /// Replaces the completion watcher.
    pub fn with_watcher(mut self, watcher: CompletionWatcher) -> Self {
        self.watcher = watcher;
        self
    }

    /// The records of every resource requested so far.
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Fully resolved maps.
    pub fn cache(&self) -> &MapCache {
        &self.cache
    }

    /// Looks up a requested resource.
    pub fn resource(&self, id: &ResourceId) -> Option<Arc<ResourceRecord>> {
        self.registry.find(id)
    }

    /// The map most recently returned by [`load_map`](Self::load_map).
    pub fn current_map(&self) -> Option<Arc<Map>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Loads the map `name`, with its `variant` background, and every entity it
    /// places.
    ///
    /// A map that was already resolved is returned from the cache without any
    /// new fetch. Resources shared with earlier loads, whether finished or
    /// still in flight, are reused.
    ///
    /// # Errors
    ///
    /// Returns a [`MapLoadError`] naming the map if any of its resources fails
    /// to load or its definition cannot be assembled. The underlying cause is
    /// only logged.
    pub async fn load_map(
        &self,
        name: &str,
        variant: Option<&str>,
    ) -> Result<Arc<Map>, MapLoadError> {
        if let Some(map) = self.cache.get(name, variant) {
            log::debug!("Map '{name}' served from cache");
            self.set_current(map.clone());
            return Ok(map);
        }

        match self.resolve(name, variant).await {
            Ok(map) => {
                let map = self.cache.insert(map);
                log::info!(
                    "Loaded map '{name}' with {} entities",
                    map.entities.len()
                );
                self.set_current(map.clone());
                Ok(map)
            }
            Err(cause) => {
                let error = MapLoadError::new(name, variant.map(str::to_owned));
                log::warn!("{error}: {cause}");
                Err(error)
            }
        }
    }

    async fn resolve(&self, name: &str, variant: Option<&str>) -> Result<Map, MapLoadCause> {
        let variant = variant.map(str::to_owned);

        let definition_id = ResourceId::json(ResourceKind::Map, name);
        let background_id =
            ResourceId::image(ResourceKind::Map, name).with_optional_variant(variant.clone());
        let definition = self.request([definition_id, background_id]);
        log::trace!("Map '{name}': awaiting definition");
        self.watcher.await_all(&definition).await?;

        let mut map = self.assembler.create_map(&definition[0], variant)?;

        let entity_ids = map
            .entity_identities()
            .into_iter()
            .flat_map(|(entity, entity_variant)| {
                [
                    ResourceId::json(ResourceKind::Entity, entity.clone())
                        .with_optional_variant(entity_variant.clone()),
                    ResourceId::image(ResourceKind::Entity, entity)
                        .with_optional_variant(entity_variant),
                ]
            })
            .collect::<Vec<_>>();
        let entities = self.request(entity_ids);
        log::trace!("Map '{name}': awaiting {} entity resources", entities.len());
        self.watcher.await_all(&entities).await?;

        self.assembler.inject_entities(&self.registry, &mut map);
        Ok(map)
    }

    /// Resolves `ids` to records and fetches the ones this call created.
    fn request(&self, ids: impl IntoIterator<Item = ResourceId>) -> Vec<Arc<ResourceRecord>> {
        let batch = self.registry.request_batch(ids);
        for record in &batch.fresh {
            self.fetcher.fetch(record);
        }
        batch.records
    }

    fn set_current(&self, map: Arc<Map>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(map);
    }
}
