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

//! The transport contract the fetcher reads resource bytes through.

use async_trait::async_trait;

use crate::error::TransportError;

/// A transport able to deliver the raw bytes stored at a source path.
///
/// Implementations live in `nuthead-io` (filesystem and HTTP). The path handed
/// to [`read`](AssetSource::read) is the full source path, already joined with
/// the data root, so a source carries no knowledge of resource identities.
#[async_trait]
pub trait AssetSource: Send + Sync + std::fmt::Debug {
    /// Reads every byte stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the bytes cannot be delivered, including
    /// when nothing exists at `path`.
    async fn read(&self, path: &str) -> Result<Vec<u8>, TransportError>;
}
