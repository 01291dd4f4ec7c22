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

//! The storage contract behind the metrics registry.

use nuthead_core::telemetry::{Metric, MetricId, MetricType, MetricValue, MetricsError, MetricsResult};
use std::fmt::Debug;

/// Trait defining the interface for metrics storage backends.
pub trait MetricsBackend: Send + Sync + Debug + 'static {
    /// Store or replace a metric.
    fn put_metric(&self, metric: Metric) -> MetricsResult<()>;

    /// Retrieve a copy of a metric.
    fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric>;

    /// Atomically applies `apply` to a stored value and returns the new value.
    fn update_value(
        &self,
        id: &MetricId,
        apply: &mut dyn FnMut(&mut MetricValue) -> MetricsResult<()>,
    ) -> MetricsResult<MetricValue>;

    /// Increment a counter by the given amount.
    fn increment_counter(&self, id: &MetricId, delta: u64) -> MetricsResult<u64> {
        let value = self.update_value(id, &mut |value| match value {
            MetricValue::Counter(count) => {
                *count = count.saturating_add(delta);
                Ok(())
            }
            other => Err(mismatch(MetricType::Counter, other)),
        })?;
        Ok(value.as_counter().unwrap_or_default())
    }

    /// Add `delta` to a gauge (negative to decrease).
    fn add_to_gauge(&self, id: &MetricId, delta: f64) -> MetricsResult<f64> {
        let value = self.update_value(id, &mut |value| match value {
            MetricValue::Gauge(level) => {
                *level += delta;
                Ok(())
            }
            other => Err(mismatch(MetricType::Gauge, other)),
        })?;
        Ok(value.as_gauge().unwrap_or_default())
    }

    /// Record one observation in a histogram.
    fn record_histogram_sample(&self, id: &MetricId, sample: f64) -> MetricsResult<()> {
        self.update_value(id, &mut |value| match value {
            MetricValue::Histogram {
                bucket_bounds,
                bucket_counts,
                count,
                sum,
            } => {
                let bucket = bucket_bounds
                    .iter()
                    .position(|bound| sample <= *bound)
                    .unwrap_or(bucket_bounds.len());
                bucket_counts[bucket] += 1;
                *count += 1;
                *sum += sample;
                Ok(())
            }
            other => Err(mismatch(MetricType::Histogram, other)),
        })
        .map(|_| ())
    }
}

fn mismatch(expected: MetricType, found: &MetricValue) -> MetricsError {
    MetricsError::TypeMismatch {
        expected,
        found: found.metric_type(),
    }
}
