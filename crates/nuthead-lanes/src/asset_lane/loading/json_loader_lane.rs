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

//! JSON document loading.

use crate::asset_lane::AssetLoaderLane;
use nuthead_core::asset::{AssetFormat, ResourcePayload};
use nuthead_core::error::LoadError;

/// A lane that parses UTF-8 JSON documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLoaderLane;

impl AssetLoaderLane for JsonLoaderLane {
    fn strategy_name(&self) -> &'static str {
        "NH_JSON_V1"
    }

    fn format(&self) -> AssetFormat {
        AssetFormat::Json
    }

    fn load(&self, path: &str, bytes: &[u8]) -> Result<ResourcePayload, LoadError> {
        let value = serde_json::from_slice(bytes).map_err(|e| LoadError::Parse {
            path: path.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(ResourcePayload::Json(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_documents() {
        let payload = JsonLoaderLane
            .load("data/map/test.json", br#"{ "width": 20, "entities": [] }"#)
            .unwrap();

        assert_eq!(
            payload.as_json(),
            Some(&json!({ "width": 20, "entities": [] }))
        );
    }

    #[test]
    fn invalid_text_is_a_parse_error() {
        let err = JsonLoaderLane
            .load("data/map/test.json", b"{ width: ")
            .unwrap_err();

        match err {
            LoadError::Parse { path, .. } => assert_eq!(path, "data/map/test.json"),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
