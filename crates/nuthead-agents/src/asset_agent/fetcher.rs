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

//! Background loading of individual resources.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use nuthead_core::asset::{ResourcePayload, ResourceRecord};
use nuthead_core::error::{LoadError, TransportError};
use nuthead_core::source::AssetSource;
use nuthead_core::telemetry::MetricsResult;
use nuthead_telemetry::{
    CounterHandle, GaugeHandle, HistogramHandle, MetricsRegistry, ScopedMetricTimer,
};

use super::loader::AssetLoaderLaneRegistry;

/// A collection of metric handles used by the fetcher.
#[derive(Debug)]
struct FetchMetrics {
    /// Counter of fetches actually started.
    fetch_requests_total: CounterHandle,
    /// Counter of records that reached `Loaded`.
    loaded_total: CounterHandle,
    /// Counter of records that reached `Failed`.
    failed_total: CounterHandle,
    /// Gauge of fetches started but not yet settled.
    in_flight: GaugeHandle,
    /// Histogram of read-and-decode times in milliseconds.
    load_time_ms: HistogramHandle,
}

impl FetchMetrics {
    fn new(registry: &MetricsRegistry) -> MetricsResult<Self> {
        Ok(Self {
            fetch_requests_total: registry.register_counter(
                "assets",
                "fetch_requests_total",
                "Total number of resource fetches started",
            )?,
            loaded_total: registry.register_counter(
                "assets",
                "loaded_total",
                "Total number of resources loaded",
            )?,
            failed_total: registry.register_counter(
                "assets",
                "failed_total",
                "Total number of resources that failed to load",
            )?,
            in_flight: registry.register_gauge(
                "assets",
                "in_flight",
                "Number of resource fetches not yet settled",
                "count",
            )?,
            load_time_ms: registry.register_histogram(
                "assets",
                "load_time",
                "Resource read and decode time",
                "ms",
                vec![1.0, 5.0, 16.0, 33.0, 100.0, 500.0],
            )?,
        })
    }
}

fn bump(counter: &CounterHandle) {
    if let Err(e) = counter.increment() {
        log::warn!("Failed to update metric {}: {e}", counter.id());
    }
}

fn shift(gauge: &GaugeHandle, delta: f64) {
    if let Err(e) = gauge.add(delta) {
        log::warn!("Failed to update metric {}: {e}", gauge.id());
    }
}

fn panic_reason(panic: &(dyn Any + Send)) -> String {
    let message = panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic");
    format!("read panicked: {message}")
}

/// Starts the retrieval of resource records.
///
/// Cloning a fetcher is cheap; clones share the source, lanes and metrics.
#[derive(Debug, Clone)]
pub struct AssetFetcher {
    source: Arc<dyn AssetSource>,
    data_root: Arc<str>,
    loaders: Arc<AssetLoaderLaneRegistry>,
    metrics: Arc<FetchMetrics>,
}

impl AssetFetcher {
    /// Creates a fetcher reading through `source` below the normalized
    /// `data_root`, with the default JSON and image lanes.
    ///
    /// Its metrics are registered in the `assets` namespace of `metrics`.
    pub fn new(
        source: Arc<dyn AssetSource>,
        data_root: impl Into<String>,
        metrics: &MetricsRegistry,
    ) -> MetricsResult<Self> {
        Ok(Self {
            source,
            data_root: Arc::from(data_root.into()),
            loaders: Arc::new(AssetLoaderLaneRegistry::with_default_lanes()),
            metrics: Arc::new(FetchMetrics::new(metrics)?),
        })
    }

    /// Replaces the decoding lanes.
    pub fn with_loaders(mut self, loaders: AssetLoaderLaneRegistry) -> Self {
        self.loaders = Arc::new(loaders);
        self
    }

    /// The data root source paths are derived from.
    pub fn data_root(&self) -> &str {
        &self.data_root
    }

    /// Starts loading `record` in the background.
    ///
    /// Only a `Defined` record is fetched: it moves to `Loading` right away and
    /// settles as `Loaded` or `Failed` once a spawned task has read and decoded
    /// it. For any other record this does nothing, so each record is fetched at
    /// most once. Returns `true` if a fetch was started.
    ///
    /// A source that panics fails the record with a transport error.
    ///
    /// Must be called from within a tokio runtime.
    pub fn fetch(&self, record: &Arc<ResourceRecord>) -> bool {
        let path = record.id().source_path(&self.data_root);
        if !record.begin_loading(path.clone()) {
            log::trace!("Skipping fetch of {}: already {}", record.id(), record.status());
            return false;
        }

        bump(&self.metrics.fetch_requests_total);
        shift(&self.metrics.in_flight, 1.0);
        log::debug!("Fetching {} from '{path}'", record.id());

        let fetcher = self.clone();
        let record = record.clone();
        tokio::spawn(async move { fetcher.run(&record, path).await });
        true
    }

    async fn run(&self, record: &ResourceRecord, path: String) {
        let result = {
            let _timer = ScopedMetricTimer::new(&self.metrics.load_time_ms);
            // A panicking source must still settle the record.
            AssertUnwindSafe(self.read_and_decode(record, path.clone()))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| {
                    Err(LoadError::Transport(TransportError::new(
                        path,
                        panic_reason(panic.as_ref()),
                    )))
                })
        };
        shift(&self.metrics.in_flight, -1.0);

        match result {
            Ok(payload) => {
                if record.complete(payload) {
                    bump(&self.metrics.loaded_total);
                    log::debug!("Loaded {}", record.id());
                }
            }
            Err(error) => {
                log::warn!("Failed to load {}: {error}", record.id());
                if record.fail(error) {
                    bump(&self.metrics.failed_total);
                }
            }
        }
    }

    async fn read_and_decode(
        &self,
        record: &ResourceRecord,
        path: String,
    ) -> Result<ResourcePayload, LoadError> {
        let bytes = self.source.read(&path).await?;
        let format = record.id().format;
        let loaders = self.loaders.clone();
        let lane_path = path.clone();

        // Image decoding is CPU bound and stays off the async workers.
        tokio::task::spawn_blocking(move || loaders.load(format, &lane_path, &bytes))
            .await
            .unwrap_or_else(|e| {
                Err(LoadError::Decode {
                    path,
                    reason: e.to_string(),
                })
            })
    }
}
