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

//! Completion detection for batches of resource records.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use nuthead_core::asset::{ResourceRecord, ResourceStatus};
use nuthead_core::error::{AggregateLoadError, ResourceReport};
use tokio::time::MissedTickBehavior;

/// Turns a batch of records into a single outcome.
///
/// By default the watcher is event driven: it waits on every record's settle
/// notification and decides as soon as one fails or all have loaded. With a
/// settle interval it instead re-checks the batch once per tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionWatcher {
    settle_interval: Option<Duration>,
}

impl CompletionWatcher {
    /// Creates an event-driven watcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a watcher that checks the batch once every `interval`.
    pub fn with_settle_interval(interval: Duration) -> Self {
        Self {
            // tokio intervals cannot have a zero period.
            settle_interval: Some(interval.max(Duration::from_millis(1))),
        }
    }

    /// The tick period, when batching is enabled.
    pub fn settle_interval(&self) -> Option<Duration> {
        self.settle_interval
    }

    /// Resolves once every record is `Loaded`.
    ///
    /// An empty batch succeeds immediately.
    ///
    /// # Errors
    ///
    /// As soon as any record is seen `Failed`, returns an [`AggregateLoadError`]
    /// reporting every record of the batch with its status at that moment,
    /// including records that are still loading.
    pub async fn await_all(&self, records: &[Arc<ResourceRecord>]) -> Result<(), AggregateLoadError> {
        if records.is_empty() {
            return Ok(());
        }

        match self.settle_interval {
            Some(interval) => Self::poll(records, interval).await,
            None => Self::observe(records).await,
        }
    }

    async fn observe(records: &[Arc<ResourceRecord>]) -> Result<(), AggregateLoadError> {
        let mut pending: FuturesUnordered<_> =
            records.iter().map(|record| record.settled()).collect();

        while let Some(status) = pending.next().await {
            if status == ResourceStatus::Failed {
                return Err(report(records));
            }
        }
        Ok(())
    }

    async fn poll(
        records: &[Arc<ResourceRecord>],
        interval: Duration,
    ) -> Result<(), AggregateLoadError> {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if records.iter().any(|r| r.status() == ResourceStatus::Failed) {
                return Err(report(records));
            }
            if records.iter().all(|r| r.status() == ResourceStatus::Loaded) {
                return Ok(());
            }
        }
    }
}

fn report(records: &[Arc<ResourceRecord>]) -> AggregateLoadError {
    let reports = records
        .iter()
        .map(|record| {
            let status = record.status();
            ResourceReport {
                id: record.id().clone(),
                status,
                error: match status {
                    ResourceStatus::Failed => record.error(),
                    _ => None,
                },
            }
        })
        .collect();

    let error = AggregateLoadError { reports };
    log::debug!("{error}");
    error
}
