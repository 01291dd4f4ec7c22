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

//! In-memory metrics storage.

use crate::storage::backend::MetricsBackend;
use nuthead_core::telemetry::{Metric, MetricId, MetricValue, MetricsError, MetricsResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory metrics backend using `RwLock<HashMap>`.
///
/// Reads share the lock; every update takes it exclusively for the duration
/// of a single read-modify-write, so concurrent increments never get lost.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    storage: RwLock<HashMap<MetricId, Metric>>,
}

impl InMemoryBackend {
    /// Create a new in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetricsBackend for InMemoryBackend {
    fn put_metric(&self, metric: Metric) -> MetricsResult<()> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| MetricsError::StorageError("Failed to acquire write lock".to_string()))?;

        storage.insert(metric.id.clone(), metric);
        Ok(())
    }

    fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric> {
        let storage = self
            .storage
            .read()
            .map_err(|_| MetricsError::StorageError("Failed to acquire read lock".to_string()))?;

        storage
            .get(id)
            .cloned()
            .ok_or_else(|| MetricsError::MetricNotFound(id.clone()))
    }

    fn update_value(
        &self,
        id: &MetricId,
        apply: &mut dyn FnMut(&mut MetricValue) -> MetricsResult<()>,
    ) -> MetricsResult<MetricValue> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| MetricsError::StorageError("Failed to acquire write lock".to_string()))?;

        let metric = storage
            .get_mut(id)
            .ok_or_else(|| MetricsError::MetricNotFound(id.clone()))?;
        apply(&mut metric.value)?;
        Ok(metric.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nuthead_core::telemetry::MetricType;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn concurrent_increments_are_not_lost() {
        let backend = Arc::new(InMemoryBackend::new());
        let id = MetricId::new("assets", "fetch_requests_total");
        backend.put_metric(Metric::counter(id.clone(), "")).unwrap();

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let backend = backend.clone();
                let id = id.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        backend.increment_counter(&id, 1).unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(
            backend.get_metric(&id).unwrap().value.as_counter(),
            Some(800)
        );
    }

    #[test]
    fn histogram_buckets_samples() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("assets", "load_time");
        backend
            .put_metric(Metric::histogram(id.clone(), "", "ms", vec![1.0, 10.0]))
            .unwrap();

        for sample in [0.5, 1.0, 5.0, 50.0] {
            backend.record_histogram_sample(&id, sample).unwrap();
        }

        match backend.get_metric(&id).unwrap().value {
            MetricValue::Histogram {
                bucket_counts,
                count,
                sum,
                ..
            } => {
                assert_eq!(bucket_counts, vec![2, 1, 1]);
                assert_eq!(count, 4);
                assert_eq!(sum, 56.5);
            }
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn wrong_type_is_rejected() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("assets", "in_flight");
        backend.put_metric(Metric::gauge(id.clone(), "", "count")).unwrap();

        assert_eq!(
            backend.increment_counter(&id, 1),
            Err(MetricsError::TypeMismatch {
                expected: MetricType::Counter,
                found: MetricType::Gauge,
            })
        );
        assert!(matches!(
            backend.increment_counter(&MetricId::new("x", "y"), 1),
            Err(MetricsError::MetricNotFound(_))
        ));
    }
}
