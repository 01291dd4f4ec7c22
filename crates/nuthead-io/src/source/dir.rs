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

use std::io::ErrorKind;

use async_trait::async_trait;
use nuthead_core::error::TransportError;
use nuthead_core::source::AssetSource;

/// Reads resources from the local filesystem.
///
/// Paths are used as given: relative paths resolve against the process's
/// working directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirSource;

impl DirSource {
    /// Creates a filesystem source.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AssetSource for DirSource {
    async fn read(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        log::trace!("Reading '{path}' from disk");
        tokio::fs::read(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => TransportError::new(path, "file not found"),
            _ => TransportError::new(path, e),
        })
    }
}
