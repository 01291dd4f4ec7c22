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

//! Agents of the map-loading pipeline.
//!
//! - [`AssetFetcher`] starts one background load per resource record.
//! - [`CompletionWatcher`] waits for a batch of records to settle.
//! - [`MapAgent`] runs the two-phase `load_map` protocol on top of both.

#![warn(missing_docs)]

pub mod asset_agent;
pub mod map_agent;

pub use asset_agent::{AssetFetcher, AssetLoaderLaneRegistry, CompletionWatcher};
pub use map_agent::MapAgent;
