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

//! Registry for managing metrics.

use crate::storage::{backend::MetricsBackend, memory_backend::InMemoryBackend};
use nuthead_core::telemetry::{
    Metric, MetricId, MetricType, MetricValue, MetricsError, MetricsResult,
};
use std::sync::Arc;

/// Central registry for pipeline metrics.
///
/// Registration returns a handle bound to the metric's identifier; the handle is
/// what hot paths keep and update. Registering an identifier twice resets it.
#[derive(Debug, Clone)]
pub struct MetricsRegistry {
    backend: Arc<dyn MetricsBackend>,
}

impl MetricsRegistry {
    /// Create a new metrics registry with the default in-memory backend.
    pub fn new() -> Self {
        Self {
            backend: Arc::new(InMemoryBackend::new()),
        }
    }

    /// Create a new metrics registry with a custom backend.
    pub fn with_backend(backend: Arc<dyn MetricsBackend>) -> Self {
        Self { backend }
    }

    /// Register a new counter metric.
    pub fn register_counter(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> MetricsResult<CounterHandle> {
        let id = MetricId::new(namespace, name);
        self.backend
            .put_metric(Metric::counter(id.clone(), description))?;
        Ok(CounterHandle {
            id,
            backend: self.backend.clone(),
        })
    }

    /// Register a new gauge metric.
    pub fn register_gauge(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit: impl Into<String>,
    ) -> MetricsResult<GaugeHandle> {
        let id = MetricId::new(namespace, name);
        self.backend
            .put_metric(Metric::gauge(id.clone(), description, unit))?;
        Ok(GaugeHandle {
            id,
            backend: self.backend.clone(),
        })
    }

    /// Register a new histogram metric.
    pub fn register_histogram(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit: impl Into<String>,
        buckets: Vec<f64>,
    ) -> MetricsResult<HistogramHandle> {
        let id = MetricId::new(namespace, name);
        self.backend
            .put_metric(Metric::histogram(id.clone(), description, unit, buckets))?;
        Ok(HistogramHandle {
            id,
            backend: self.backend.clone(),
        })
    }

    /// Read a counter's value by namespace and name.
    pub fn counter_value(&self, namespace: &str, name: &str) -> MetricsResult<u64> {
        let value = self.value(namespace, name)?;
        value.as_counter().ok_or_else(|| MetricsError::TypeMismatch {
            expected: MetricType::Counter,
            found: value.metric_type(),
        })
    }

    /// Read a gauge's level by namespace and name.
    pub fn gauge_value(&self, namespace: &str, name: &str) -> MetricsResult<f64> {
        let value = self.value(namespace, name)?;
        value.as_gauge().ok_or_else(|| MetricsError::TypeMismatch {
            expected: MetricType::Gauge,
            found: value.metric_type(),
        })
    }

    fn value(&self, namespace: &str, name: &str) -> MetricsResult<MetricValue> {
        Ok(self
            .backend
            .get_metric(&MetricId::new(namespace, name))?
            .value)
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for counter operations.
#[derive(Debug, Clone)]
pub struct CounterHandle {
    id: MetricId,
    backend: Arc<dyn MetricsBackend>,
}

impl CounterHandle {
    /// Increment the counter by 1.
    pub fn increment(&self) -> MetricsResult<u64> {
        self.backend.increment_counter(&self.id, 1)
    }

    /// Get the metric ID.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

/// Handle for gauge operations.
#[derive(Debug, Clone)]
pub struct GaugeHandle {
    id: MetricId,
    backend: Arc<dyn MetricsBackend>,
}

impl GaugeHandle {
    /// Raise the gauge by `delta`.
    pub fn add(&self, delta: f64) -> MetricsResult<f64> {
        self.backend.add_to_gauge(&self.id, delta)
    }

    /// Lower the gauge by `delta`.
    pub fn sub(&self, delta: f64) -> MetricsResult<f64> {
        self.add(-delta)
    }

    /// Get the metric ID.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

/// Handle for histogram operations.
#[derive(Debug, Clone)]
pub struct HistogramHandle {
    id: MetricId,
    backend: Arc<dyn MetricsBackend>,
}

impl HistogramHandle {
    /// Record a sample in the histogram.
    pub fn observe(&self, value: f64) -> MetricsResult<()> {
        self.backend.record_histogram_sample(&self.id, value)
    }

    /// Get the metric ID.
    pub fn id(&self) -> &MetricId {
        &self.id
    }

    /// Get the full histogram metric.
    pub fn get_metric(&self) -> MetricsResult<Metric> {
        self.backend.get_metric(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_registration_and_operations() {
        let registry = MetricsRegistry::new();
        let counter = registry
            .register_counter("assets", "loaded_total", "Resources loaded")
            .unwrap();

        assert_eq!(counter.increment().unwrap(), 1);
        assert_eq!(counter.increment().unwrap(), 2);
        assert_eq!(registry.counter_value("assets", "loaded_total").unwrap(), 2);
    }

    #[test]
    fn gauge_goes_up_and_down() {
        let registry = MetricsRegistry::new();
        let gauge = registry
            .register_gauge("assets", "in_flight", "Fetches in flight", "count")
            .unwrap();

        gauge.add(3.0).unwrap();
        assert_eq!(gauge.sub(1.0).unwrap(), 2.0);
        assert_eq!(registry.gauge_value("assets", "in_flight").unwrap(), 2.0);
    }

    #[test]
    fn clones_share_the_backend() {
        let registry = MetricsRegistry::new();
        let clone = registry.clone();
        let histogram = registry
            .register_histogram("assets", "load_time", "", "ms", vec![10.0])
            .unwrap();
        histogram.observe(3.0).unwrap();

        let metric = histogram.get_metric().unwrap();
        assert!(matches!(metric.value, MetricValue::Histogram { count: 1, .. }));
        assert!(matches!(
            clone.counter_value("assets", "load_time"),
            Err(MetricsError::TypeMismatch {
                expected: MetricType::Counter,
                found: MetricType::Histogram,
            })
        ));
    }

    #[test]
    fn values_are_type_checked() {
        let registry = MetricsRegistry::new();
        registry
            .register_gauge("assets", "in_flight", "", "count")
            .unwrap();

        assert!(matches!(
            registry.counter_value("assets", "in_flight"),
            Err(MetricsError::TypeMismatch { .. })
        ));
        assert!(matches!(
            registry.gauge_value("assets", "missing"),
            Err(MetricsError::MetricNotFound(_))
        ));
    }
}
