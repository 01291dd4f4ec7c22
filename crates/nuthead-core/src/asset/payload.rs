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

use serde_json::Value;

/// An image decoded on the CPU, ready to be handed to a renderer.
///
/// Pixels are tightly packed RGBA8 rows, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
    /// Raw RGBA8 pixel data, `width * height * 4` bytes long.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Returns `true` when the image has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// The loaded content of a resource.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourcePayload {
    /// A parsed JSON document.
    Json(Value),
    /// A decoded image.
    Image(DecodedImage),
}

impl ResourcePayload {
    /// Returns the JSON document, if this is a JSON payload.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResourcePayload::Json(value) => Some(value),
            ResourcePayload::Image(_) => None,
        }
    }

    /// Returns the image, if this is an image payload.
    pub fn as_image(&self) -> Option<&DecodedImage> {
        match self {
            ResourcePayload::Image(image) => Some(image),
            ResourcePayload::Json(_) => None,
        }
    }
}
