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

//! Provides the primitive types every loaded resource is described with.
//!
//! A resource is addressed by a [`ResourceId`] (format, kind, name and an
//! optional variant) and tracked by a [`ResourceRecord`] that moves through the
//! [`ResourceStatus`] lifecycle. Once loaded, the record holds a
//! [`ResourcePayload`]: either a parsed JSON document or a [`DecodedImage`].
//!
//! These types carry no loading logic of their own. Fetching lives in the agents
//! crate and deduplication lives in the data crate.

mod identity;
mod payload;
mod record;
mod status;

pub use identity::*;
pub use payload::*;
pub use record::*;
pub use status::*;
