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

//! Defines the hierarchy of error types for the map-loading pipeline.
//!
//! - [`LoadError`] is recorded on a single resource record by the fetcher.
//! - [`AggregateLoadError`] summarizes every record of a batch that did not load.
//! - [`AssemblyError`] is raised when a map is built from an unusable record.
//! - [`MapLoadError`] is the only error callers of `load_map` ever see.

use std::fmt;

use thiserror::Error;

use crate::asset::{ResourceId, ResourceStatus};

/// The transport could not deliver a resource's bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot read '{path}': {reason}")]
pub struct TransportError {
    /// The path or URL that was requested.
    pub path: String,
    /// What the transport reported.
    pub reason: String,
}

impl TransportError {
    /// Creates a transport error for `path`.
    pub fn new(path: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Why a single resource failed to load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The bytes never arrived.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    /// The bytes arrived but are not valid JSON.
    #[error("parse error in '{path}': {reason}")]
    Parse {
        /// The path the document was read from.
        path: String,
        /// The parser's message.
        reason: String,
    },
    /// The bytes arrived but are not a usable image.
    #[error("decode error in '{path}': {reason}")]
    Decode {
        /// The path the image was read from.
        path: String,
        /// The decoder's message, or the zero-dimension diagnosis.
        reason: String,
    },
}

/// A map could not be assembled from the records it was given.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    /// The record exists but has not loaded.
    #[error("resource {id} is not loaded (status: {status})")]
    MissingResource {
        /// The record's identity.
        id: ResourceId,
        /// The status it was found in.
        status: ResourceStatus,
    },
    /// The record is not a `(json, map)` resource.
    #[error("resource {id} is not a map definition")]
    KindMismatch {
        /// The record's identity.
        id: ResourceId,
    },
    /// The map definition loaded but does not have the expected shape.
    #[error("map definition {id} is invalid: {reason}")]
    InvalidDefinition {
        /// The record's identity.
        id: ResourceId,
        /// What was wrong with it.
        reason: String,
    },
}

/// The final state of one record in a batch that did not fully load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceReport {
    /// The record's identity.
    pub id: ResourceId,
    /// Its status when the failure was detected.
    pub status: ResourceStatus,
    /// The failure reason, for failed records.
    pub error: Option<LoadError>,
}

impl fmt::Display for ResourceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.status)?;
        if let Some(error) = &self.error {
            write!(f, ": {error}")?;
        }
        Ok(())
    }
}

/// One or more resources of a batch reached `Failed`.
///
/// Every record of the batch is reported, not only the failed ones, so that
/// all simultaneous failures and the records still in flight are visible at
/// once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateLoadError {
    /// One report per record of the batch, in request order.
    pub reports: Vec<ResourceReport>,
}

impl AggregateLoadError {
    /// The reports of records that reached `Failed`.
    pub fn failures(&self) -> impl Iterator<Item = &ResourceReport> {
        self.reports
            .iter()
            .filter(|report| report.status == ResourceStatus::Failed)
    }

    /// The identities of records that reached `Failed`.
    pub fn failed_ids(&self) -> Vec<&ResourceId> {
        self.failures().map(|report| &report.id).collect()
    }
}

impl fmt::Display for AggregateLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} resources failed to load",
            self.failures().count(),
            self.reports.len()
        )?;
        for report in &self.reports {
            write!(f, "\n  - {report}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateLoadError {}

/// The lower-level failure behind a failed map load.
///
/// It is logged when the load fails and never reaches the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapLoadCause {
    /// A batch of resources did not load.
    #[error(transparent)]
    Load(#[from] AggregateLoadError),
    /// The map definition could not be assembled.
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}

/// A map could not be loaded.
///
/// The error names only the requested map and variant, and has no source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapLoadError {
    /// The requested map name.
    pub name: String,
    /// The requested map variant.
    pub variant: Option<String>,
}

impl MapLoadError {
    /// Creates a map-scoped error.
    pub fn new(name: impl Into<String>, variant: Option<String>) -> Self {
        Self {
            name: name.into(),
            variant,
        }
    }
}

impl fmt::Display for MapLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.variant {
            Some(variant) => write!(f, "cannot load map: {}, {}", self.name, variant),
            None => write!(f, "cannot load map: {}", self.name),
        }
    }
}

impl std::error::Error for MapLoadError {}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;
    use crate::asset::ResourceKind;

    fn failed_batch() -> AggregateLoadError {
        AggregateLoadError {
            reports: vec![
                ResourceReport {
                    id: ResourceId::json(ResourceKind::Map, "missing"),
                    status: ResourceStatus::Failed,
                    error: Some(LoadError::Transport(TransportError::new(
                        "data/map/missing.json",
                        "not found",
                    ))),
                },
                ResourceReport {
                    id: ResourceId::image(ResourceKind::Map, "missing"),
                    status: ResourceStatus::Loading,
                    error: None,
                },
            ],
        }
    }

    #[test]
    fn aggregate_lists_every_record() {
        let err = failed_batch();
        let message = err.to_string();

        assert!(message.starts_with("1 of 2 resources failed to load"));
        assert!(message.contains("json:map/missing (failed): transport error"));
        assert!(message.contains("image:map/missing (loading)"));
        assert_eq!(
            err.failed_ids(),
            vec![&ResourceId::json(ResourceKind::Map, "missing")]
        );
    }

    #[test]
    fn map_error_has_no_source() {
        let err = MapLoadError::new("missing", None);

        assert_eq!(err.to_string(), "cannot load map: missing");
        assert!(err.source().is_none());

        let with_variant = MapLoadError::new("test", Some("night".into()));
        assert_eq!(with_variant.to_string(), "cannot load map: test, night");
    }

    #[test]
    fn cause_keeps_the_detail_for_logs() {
        let cause = MapLoadCause::from(failed_batch());
        assert!(cause.to_string().contains("json:map/missing (failed)"));
    }

    #[test]
    fn assembly_error_display() {
        let err = AssemblyError::MissingResource {
            id: ResourceId::json(ResourceKind::Map, "test"),
            status: ResourceStatus::Loading,
        };
        assert_eq!(
            err.to_string(),
            "resource json:map/test is not loaded (status: loading)"
        );
    }
}
