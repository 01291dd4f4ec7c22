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

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use async_trait::async_trait;
use image::{ImageFormat, Rgba, RgbaImage};
use nuthead_core::error::TransportError;
use nuthead_core::source::AssetSource;
use nuthead_io::DirSource;
use serde_json::Value;

/// Wraps another source and counts the reads of every path.
#[derive(Debug)]
pub struct CountingSource {
    inner: Arc<dyn AssetSource>,
    reads: Mutex<HashMap<String, usize>>,
}

impl CountingSource {
    pub fn new(inner: Arc<dyn AssetSource>) -> Self {
        Self {
            inner,
            reads: Mutex::new(HashMap::new()),
        }
    }

    /// The number of reads issued so far, failed ones included.
    pub fn reads(&self) -> usize {
        self.reads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .sum()
    }

    /// How many times `path` was read.
    pub fn reads_of(&self, path: &str) -> usize {
        self.reads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl AssetSource for CountingSource {
    async fn read(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        *self
            .reads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(path.to_owned())
            .or_default() += 1;
        self.inner.read(path).await
    }
}

/// A source whose every read panics.
#[derive(Debug)]
pub struct PanickingSource;

#[async_trait]
impl AssetSource for PanickingSource {
    async fn read(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        panic!("storage backend crashed reading {path}");
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Writes `document` to `<root>/<relative>`.
pub fn write_json(root: &Path, relative: &str, document: &Value) -> Result<()> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_vec_pretty(document)?)?;
    Ok(())
}

/// Encodes a solid `width` x `height` PNG at `<root>/<relative>`.
pub fn write_png(root: &Path, relative: &str, width: u32, height: u32) -> Result<()> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut bytes = Vec::new();
    RgbaImage::from_pixel(width, height, Rgba([200, 40, 90, 255]))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// A filesystem source that counts its reads.
pub fn counting_dir_source() -> Arc<CountingSource> {
    Arc::new(CountingSource::new(Arc::new(DirSource::new())))
}

pub fn root_string(root: &Path) -> String {
    root.to_string_lossy().into_owned()
}
