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

//! The public-facing API of the map-loading pipeline.
//!
//! [`Nuthead`] wires a [`PipelineConfig`] to a transport and a [`MapAgent`], and
//! is all a renderer needs: it loads maps and hands out the decoded images and
//! parsed documents of everything a loaded map references.

#![warn(missing_docs)]

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use nuthead_agents::{CompletionWatcher, MapAgent};
use nuthead_core::asset::{ResourceId, ResourceKind, ResourcePayload, ResourceStatus};
use nuthead_core::error::MapLoadError;
use nuthead_core::map::Map;
use nuthead_core::source::AssetSource;
use nuthead_io::{DirSource, HttpSource};
use nuthead_telemetry::MetricsRegistry;

pub use nuthead_core::config::PipelineConfig;

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use nuthead_core::asset::{
        AssetFormat, DecodedImage, ResourceId, ResourceKind, ResourcePayload, ResourceStatus,
    };
    pub use nuthead_core::error::MapLoadError;
    pub use nuthead_core::map::{EntityFields, EntityPlacement, Map, MapStatus};

    pub use crate::{Nuthead, PipelineConfig};
}

/// A configured map loader.
#[derive(Debug)]
pub struct Nuthead {
    config: PipelineConfig,
    metrics: MetricsRegistry,
    agent: MapAgent,
}

impl Nuthead {
    /// Builds a loader for `config`, reading over HTTP for `http://` and
    /// `https://` data roots and from the filesystem otherwise.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let source = select_source(&config)?;
        Self::with_source(config, source)
    }

    /// Builds a loader from a TOML configuration file.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = PipelineConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
        Self::new(config)
    }

    /// Builds a loader reading through a caller-provided transport.
    pub fn with_source(config: PipelineConfig, source: Arc<dyn AssetSource>) -> Result<Self> {
        let metrics = MetricsRegistry::new();
        let data_root = config.data_root();
        let mut agent = MapAgent::new(source, data_root.clone(), &metrics)
            .context("Failed to register pipeline metrics")?;
        if let Some(interval) = config.settle_interval() {
            agent = agent.with_watcher(CompletionWatcher::with_settle_interval(interval));
        }

        log::info!("Map loader ready, reading from '{data_root}'");
        Ok(Self {
            config,
            metrics,
            agent,
        })
    }

    /// Loads a map and everything it references. See [`MapAgent::load_map`].
    pub async fn load_map(
        &self,
        name: &str,
        variant: Option<&str>,
    ) -> Result<Arc<Map>, MapLoadError> {
        self.agent.load_map(name, variant).await
    }

    /// The map most recently loaded.
    pub fn current_map(&self) -> Option<Arc<Map>> {
        self.agent.current_map()
    }

    /// The payload of a loaded resource, addressed by identity.
    ///
    /// Returns `None` for resources never requested or not (yet) loaded.
    pub fn resource(&self, id: &ResourceId) -> Option<Arc<ResourcePayload>> {
        let record = self.agent.resource(id)?;
        match record.status() {
            ResourceStatus::Loaded => record.payload(),
            _ => None,
        }
    }

    /// The sprite sheet of an entity.
    pub fn entity_image(&self, name: &str, variant: Option<&str>) -> Option<Arc<ResourcePayload>> {
        self.resource(
            &ResourceId::image(ResourceKind::Entity, name)
                .with_optional_variant(variant.map(str::to_owned)),
        )
    }

    /// The shared definition document of an entity.
    pub fn entity_definition(
        &self,
        name: &str,
        variant: Option<&str>,
    ) -> Option<Arc<ResourcePayload>> {
        self.resource(
            &ResourceId::json(ResourceKind::Entity, name)
                .with_optional_variant(variant.map(str::to_owned)),
        )
    }

    /// The background image of a loaded map.
    pub fn map_image(&self, map: &Map) -> Option<Arc<ResourcePayload>> {
        self.resource(
            &ResourceId::image(ResourceKind::Map, map.name.clone())
                .with_optional_variant(map.variant.clone()),
        )
    }

    /// The configuration this loader was built with.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The pipeline's metrics.
    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }
}

fn select_source(config: &PipelineConfig) -> Result<Arc<dyn AssetSource>> {
    if config.is_remote() {
        let source = HttpSource::new(config.http_timeout()).context("Failed to create HTTP source")?;
        Ok(Arc::new(source))
    } else {
        Ok(Arc::new(DirSource::new()))
    }
}
