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

//! # Nuthead Core
//!
//! Foundational crate containing the resource identities, lifecycle records,
//! map model, error hierarchy and transport contract shared by every other
//! crate of the map-loading pipeline.

#![warn(missing_docs)]

pub mod asset;
pub mod config;
pub mod error;
pub mod map;
pub mod source;
pub mod telemetry;

pub use asset::{
    AssetFormat, DecodedImage, ResourceId, ResourceKind, ResourcePayload, ResourceRecord,
    ResourceStatus,
};
pub use config::PipelineConfig;
pub use error::{
    AggregateLoadError, AssemblyError, LoadError, MapLoadCause, MapLoadError, ResourceReport,
    TransportError,
};
pub use map::{EntityFields, EntityPlacement, Map, MapDefinition, MapStatus};
pub use source::AssetSource;
