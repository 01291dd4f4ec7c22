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

//! Pipeline configuration.
//!
//! The configuration is usually built in code with [`PipelineConfig::new`], but
//! can also be read from a TOML file such as:
//!
//! ```toml
//! data_root = "https://cdn.example.com/game/data"
//! settle_interval_ms = 100
//! http_timeout_secs = 10
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An error raised while reading a [`PipelineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config file '{path}': {source}")]
    Io {
        /// The path of the file.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid TOML for this structure.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings fixed when a pipeline is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Where resources live: a directory or an `http(s)://` URL. Normalized by
    /// [`data_root`](PipelineConfig::data_root).
    pub data_root: String,
    /// When set, completion is checked once per interval instead of on every
    /// record transition, coalescing many simultaneous settles into one.
    pub settle_interval_ms: Option<u64>,
    /// Timeout for a single HTTP request.
    pub http_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_root: "data".to_string(),
            settle_interval_ms: None,
            http_timeout_secs: 30,
        }
    }
}

impl PipelineConfig {
    /// Creates a configuration with the given data root and default settings.
    pub fn new(data_root: impl Into<String>) -> Self {
        Self {
            data_root: data_root.into(),
            ..Self::default()
        }
    }

    /// Parses a configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// The normalized data root.
    pub fn data_root(&self) -> String {
        normalize_data_root(&self.data_root)
    }

    /// Returns `true` when the data root must be read over HTTP.
    pub fn is_remote(&self) -> bool {
        let root = self.data_root.trim();
        root.starts_with("http://") || root.starts_with("https://")
    }

    /// The completion settle interval, if batching is enabled.
    pub fn settle_interval(&self) -> Option<Duration> {
        self.settle_interval_ms.map(Duration::from_millis)
    }

    /// The per-request HTTP timeout.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Trims a data root and removes its empty path segments.
///
/// A `scheme://` prefix and the leading `/` of an absolute path are kept, so
/// `" /srv//game/data/ "` becomes `"/srv/game/data"` and
/// `"https://cdn.local//data/"` becomes `"https://cdn.local/data"`.
pub fn normalize_data_root(raw: &str) -> String {
    let trimmed = raw.trim();

    let (prefix, rest) = match trimmed.find("://") {
        Some(index) => trimmed.split_at(index + 3),
        None if trimmed.starts_with('/') => ("/", trimmed),
        None => ("", trimmed),
    };

    let segments: Vec<&str> = rest.split('/').filter(|segment| !segment.is_empty()).collect();
    format!("{}{}", prefix, segments.join("/"))
}
