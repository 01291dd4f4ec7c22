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

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use nuthead_core::asset::{ResourceId, ResourceRecord};

/// The records returned for one batch request.
#[derive(Debug, Default)]
pub struct RequestedBatch {
    /// One record per distinct identity, in first-seen order.
    pub records: Vec<Arc<ResourceRecord>>,
    /// The subset of `records` created by this request. Only these need a fetch.
    pub fresh: Vec<Arc<ResourceRecord>>,
}

/// A central store mapping each resource identity to its single record.
///
/// A record, once created, stays in the registry for the registry's lifetime,
/// so a second request for the same identity always gets the same instance
/// back. That is what makes every resource load at most once.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    records: Mutex<HashMap<ResourceId, Arc<ResourceRecord>>>,
}

impl ResourceRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record for `id`, creating it in the `Defined` status first if
    /// needed. The flag tells whether this call created it.
    pub fn get_or_create(&self, id: ResourceId) -> (Arc<ResourceRecord>, bool) {
        let mut records = self.lock();
        Self::insert_if_absent(&mut records, id)
    }

    /// Looks up the record for `id` without creating one.
    pub fn find(&self, id: &ResourceId) -> Option<Arc<ResourceRecord>> {
        self.lock().get(id).cloned()
    }

    /// Resolves a whole batch under a single lock.
    ///
    /// Duplicate identities in `ids` collapse to one record.
    pub fn request_batch(&self, ids: impl IntoIterator<Item = ResourceId>) -> RequestedBatch {
        let mut batch = RequestedBatch::default();
        let mut seen = HashSet::new();
        let mut records = self.lock();

        for id in ids {
            if !seen.insert(id.clone()) {
                continue;
            }
            let (record, created) = Self::insert_if_absent(&mut records, id);
            if created {
                batch.fresh.push(record.clone());
            }
            batch.records.push(record);
        }

        log::trace!(
            "Requested {} resources, {} new",
            batch.records.len(),
            batch.fresh.len()
        );
        batch
    }

    /// The number of records ever created.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if no record was ever created.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// A snapshot of every record, in no particular order.
    pub fn records(&self) -> Vec<Arc<ResourceRecord>> {
        self.lock().values().cloned().collect()
    }

    fn insert_if_absent(
        records: &mut HashMap<ResourceId, Arc<ResourceRecord>>,
        id: ResourceId,
    ) -> (Arc<ResourceRecord>, bool) {
        if let Some(existing) = records.get(&id) {
            return (existing.clone(), false);
        }
        let record = Arc::new(ResourceRecord::new(id.clone()));
        records.insert(id, record.clone());
        (record, true)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ResourceId, Arc<ResourceRecord>>> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nuthead_core::asset::{ResourceKind, ResourceStatus};
    use std::thread;

    fn flower() -> ResourceId {
        ResourceId::json(ResourceKind::Entity, "flower").with_variant("blue")
    }

    #[test]
    fn same_identity_yields_same_record() {
        let registry = ResourceRegistry::new();

        let (first, created) = registry.get_or_create(flower());
        assert!(created);
        let (second, created) = registry.get_or_create(flower());
        assert!(!created);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.status(), ResourceStatus::Defined);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn variant_is_part_of_the_identity() {
        let registry = ResourceRegistry::new();
        let plain = ResourceId::json(ResourceKind::Entity, "flower");

        registry.get_or_create(plain.clone());
        registry.get_or_create(flower());
        registry.get_or_create(ResourceId::image(ResourceKind::Entity, "flower"));

        assert_eq!(registry.len(), 3);
        assert!(registry.find(&plain).is_some());
    }

    #[test]
    fn find_never_creates() {
        let registry = ResourceRegistry::new();
        assert!(registry.find(&flower()).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn batch_collapses_duplicates_and_reports_fresh_records() {
        let registry = ResourceRegistry::new();
        let (existing, _) = registry.get_or_create(flower());
        let tree = ResourceId::json(ResourceKind::Entity, "tree");

        let batch = registry.request_batch(vec![flower(), tree.clone(), tree.clone(), flower()]);

        assert_eq!(batch.records.len(), 2);
        assert!(Arc::ptr_eq(&batch.records[0], &existing));
        assert_eq!(batch.records[1].id(), &tree);
        assert_eq!(batch.fresh.len(), 1);
        assert_eq!(batch.fresh[0].id(), &tree);
    }

    #[test]
    fn concurrent_creation_produces_one_record() {
        let registry = Arc::new(ResourceRegistry::new());

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || registry.get_or_create(flower()).1)
            })
            .collect();
        let created = workers
            .into_iter()
            .map(|worker| worker.join().unwrap())
            .filter(|created| *created)
            .count();

        assert_eq!(created, 1);
        assert_eq!(registry.records().len(), 1);
    }
}
