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

use std::fmt;

/// The lifecycle of a [`ResourceRecord`](super::ResourceRecord).
///
/// `Defined → Loading → (Loaded | Failed)`. The last two are terminal: a record
/// never leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResourceStatus {
    /// Created by the registry, no fetch issued yet.
    #[default]
    Defined,
    /// A fetch is in flight.
    Loading,
    /// The payload is available.
    Loaded,
    /// The fetch failed; the record keeps the reason.
    Failed,
}

impl ResourceStatus {
    /// Returns `true` for `Loaded` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, ResourceStatus::Loaded | ResourceStatus::Failed)
    }

    /// A lowercase name for logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceStatus::Defined => "defined",
            ResourceStatus::Loading => "loading",
            ResourceStatus::Loaded => "loaded",
            ResourceStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
