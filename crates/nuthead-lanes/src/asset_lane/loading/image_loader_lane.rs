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

//! Image decoding.

use crate::asset_lane::AssetLoaderLane;
use image::DynamicImage;
use nuthead_core::asset::{AssetFormat, DecodedImage, ResourcePayload};
use nuthead_core::error::LoadError;

/// A lane dedicated to decoding images into RGBA8 pixels on the CPU.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageLoaderLane;

impl AssetLoaderLane for ImageLoaderLane {
    fn strategy_name(&self) -> &'static str {
        "NH_IMAGE_RGBA8_V1"
    }

    fn format(&self) -> AssetFormat {
        AssetFormat::Image
    }

    fn load(&self, path: &str, bytes: &[u8]) -> Result<ResourcePayload, LoadError> {
        let img = image::load_from_memory(bytes).map_err(|e| LoadError::Decode {
            path: path.to_owned(),
            reason: e.to_string(),
        })?;
        rgba_payload(path, img)
    }
}

/// Converts a decoded image to packed RGBA8, rejecting images without pixels.
fn rgba_payload(path: &str, img: DynamicImage) -> Result<ResourcePayload, LoadError> {
    let rgba_img = img.to_rgba8();
    let (width, height) = rgba_img.dimensions();
    let decoded = DecodedImage {
        width,
        height,
        pixels: rgba_img.into_raw(),
    };

    if decoded.is_empty() {
        return Err(LoadError::Decode {
            path: path.to_owned(),
            reason: format!("image has no pixels ({width}x{height})"),
        });
    }
    Ok(ResourcePayload::Image(decoded))
}
