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

//! A registry of decoding lanes, selected by asset format.

use std::collections::HashMap;

use nuthead_core::asset::{AssetFormat, ResourcePayload};
use nuthead_core::error::LoadError;
use nuthead_lanes::{AssetLoaderLane, ImageLoaderLane, JsonLoaderLane};

/// Dispatches fetched bytes to the lane registered for their format.
#[derive(Debug, Default)]
pub struct AssetLoaderLaneRegistry {
    lanes: HashMap<AssetFormat, Box<dyn AssetLoaderLane>>,
}

impl AssetLoaderLaneRegistry {
    /// Creates a registry with no lanes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the JSON and image lanes.
    pub fn with_default_lanes() -> Self {
        let mut registry = Self::new();
        registry.register(JsonLoaderLane);
        registry.register(ImageLoaderLane);
        registry
    }

    /// Registers `lane` for its format, replacing any previous lane.
    pub fn register(&mut self, lane: impl AssetLoaderLane + 'static) {
        log::debug!(
            "Registering loader lane '{}' for {} resources",
            lane.strategy_name(),
            lane.format()
        );
        self.lanes.insert(lane.format(), Box::new(lane));
    }

    /// Decodes `bytes` read from `path` with the lane for `format`.
    pub fn load(
        &self,
        format: AssetFormat,
        path: &str,
        bytes: &[u8],
    ) -> Result<ResourcePayload, LoadError> {
        let lane = self.lanes.get(&format).ok_or_else(|| LoadError::Decode {
            path: path.to_owned(),
            reason: format!("no loader lane registered for {format} resources"),
        })?;
        lane.load(path, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_by_format() {
        let registry = AssetLoaderLaneRegistry::with_default_lanes();

        let payload = registry.load(AssetFormat::Json, "a.json", b"[1]").unwrap();
        assert!(payload.as_json().is_some());

        let err = registry.load(AssetFormat::Image, "a.png", b"[1]").unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
    }

    #[test]
    fn missing_lane_is_a_decode_error() {
        let err = AssetLoaderLaneRegistry::new()
            .load(AssetFormat::Json, "a.json", b"{}")
            .unwrap_err();

        match err {
            LoadError::Decode { reason, .. } => assert!(reason.contains("json"), "{reason}"),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
