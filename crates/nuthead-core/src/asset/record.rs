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
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use super::{ResourceId, ResourcePayload, ResourceStatus};
use crate::error::LoadError;

#[derive(Default)]
struct RecordState {
    source_path: Option<String>,
    payload: Option<Arc<ResourcePayload>>,
    error: Option<LoadError>,
}

/// The tracked lifecycle state of one resource identity.
///
/// Records are created by the registry and shared behind an `Arc`. The status
/// lives in a `watch` channel so that any number of waiters can await the
/// record settling without polling. Transitions only ever move forward:
/// `Defined → Loading → Loaded | Failed`.
pub struct ResourceRecord {
    id: ResourceId,
    state: Mutex<RecordState>,
    status: watch::Sender<ResourceStatus>,
}

impl ResourceRecord {
    /// Creates a record in the `Defined` status.
    pub fn new(id: ResourceId) -> Self {
        let (status, _) = watch::channel(ResourceStatus::Defined);
        Self {
            id,
            state: Mutex::new(RecordState::default()),
            status,
        }
    }

    /// The identity this record tracks.
    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    /// The current status.
    pub fn status(&self) -> ResourceStatus {
        *self.status.borrow()
    }

    /// The path the resource was requested from, once a fetch has begun.
    pub fn source_path(&self) -> Option<String> {
        self.lock_state().source_path.clone()
    }

    /// The loaded payload. `None` unless the status is `Loaded`.
    pub fn payload(&self) -> Option<Arc<ResourcePayload>> {
        self.lock_state().payload.clone()
    }

    /// The reason the record failed. `None` unless the status is `Failed`.
    pub fn error(&self) -> Option<LoadError> {
        self.lock_state().error.clone()
    }

    /// Moves a `Defined` record to `Loading` and remembers its source path.
    ///
    /// Returns `false`, leaving the record untouched, when a fetch was already
    /// started or the record has settled. Callers use the return value to decide
    /// whether they own the fetch.
    pub fn begin_loading(&self, source_path: impl Into<String>) -> bool {
        let mut state = self.lock_state();
        let started = self.status.send_if_modified(|status| {
            if *status == ResourceStatus::Defined {
                *status = ResourceStatus::Loading;
                true
            } else {
                false
            }
        });
        if started {
            state.source_path = Some(source_path.into());
        }
        started
    }

    /// Settles the record as `Loaded` with the given payload.
    ///
    /// Returns `false` if the record had already settled.
    pub fn complete(&self, payload: ResourcePayload) -> bool {
        self.settle(ResourceStatus::Loaded, |state| {
            state.payload = Some(Arc::new(payload));
        })
    }

    /// Settles the record as `Failed`, keeping the reason.
    ///
    /// Returns `false` if the record had already settled.
    pub fn fail(&self, error: LoadError) -> bool {
        self.settle(ResourceStatus::Failed, |state| {
            state.error = Some(error);
        })
    }

    /// Subscribes to status changes.
    pub fn subscribe(&self) -> watch::Receiver<ResourceStatus> {
        self.status.subscribe()
    }

    /// Waits until the record reaches a terminal status and returns it.
    pub async fn settled(&self) -> ResourceStatus {
        let mut receiver = self.subscribe();
        let status = match receiver.wait_for(|status| status.is_terminal()).await {
            Ok(status) => *status,
            // The sender lives as long as `self`; this only guards against a
            // closed channel by reporting the last known status.
            Err(_) => self.status(),
        };
        status
    }

    // The payload or error is written while the state lock is still held, so a
    // reader that observes the terminal status always finds the data with it.
    fn settle(&self, terminal: ResourceStatus, apply: impl FnOnce(&mut RecordState)) -> bool {
        let mut state = self.lock_state();
        let settled = self.status.send_if_modified(|status| {
            if status.is_terminal() {
                false
            } else {
                *status = terminal;
                true
            }
        });
        if settled {
            apply(&mut state);
        } else {
            log::warn!("Ignoring late {terminal} transition for settled resource {}", self.id);
        }
        settled
    }

    fn lock_state(&self) -> MutexGuard<'_, RecordState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRecord")
            .field("id", &self.id)
            .field("status", &self.status())
            .field("source_path", &self.source_path())
            .finish()
    }
}
