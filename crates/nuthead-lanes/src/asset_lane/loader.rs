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

use nuthead_core::asset::{AssetFormat, ResourcePayload};
use nuthead_core::error::LoadError;

/// A trait for lanes that turn the raw bytes of one asset format into a payload.
///
/// This is the CPU side of loading: the bytes have already been delivered by a
/// transport, and the lane only parses or decodes them. Each lane handles
/// exactly one [`AssetFormat`].
pub trait AssetLoaderLane: Send + Sync + std::fmt::Debug {
    /// A stable name for logs.
    fn strategy_name(&self) -> &'static str;

    /// The format this lane decodes.
    fn format(&self) -> AssetFormat;

    /// Parses `bytes`, read from `path`, into a payload.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Parse`] or [`LoadError::Decode`] naming `path` when
    /// the bytes are not valid for this format.
    fn load(&self, path: &str, bytes: &[u8]) -> Result<ResourcePayload, LoadError>;
}
