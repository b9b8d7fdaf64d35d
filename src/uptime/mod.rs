// Uptime engine: window math + pure aggregation + the calculator that fans
// out event-store queries per service and folds results into one report.

pub mod aggregation;
mod intervals;
mod window;

pub use intervals::merge_intervals;
pub use window::{Window, WindowLabel};

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use thiserror::Error;
use tokio::time::timeout;

use crate::config::AggregationConfig;
use crate::event_repo::EventRepo;
use crate::models::{Service, ServiceStatus, UptimeReport};

/// Why one service's percentages are missing from a report. Failures are
/// isolated per service; the rest of the batch still completes.
#[derive(Debug, Error)]
pub enum ServiceQueryError {
    #[error("event store query failed: {0:#}")]
    Store(anyhow::Error),
    #[error("event store query timed out after {0:?}")]
    Timeout(Duration),
}

/// Computes per-service and overall uptime percentages for the standard
/// trailing windows. Stateless between requests; no caching.
pub struct UptimeCalculator {
    repo: Arc<EventRepo>,
    max_concurrent_queries: usize,
    query_timeout: Duration,
}

impl UptimeCalculator {
    pub fn new(repo: Arc<EventRepo>, config: &AggregationConfig) -> Self {
        Self {
            repo,
            max_concurrent_queries: config.max_concurrent_queries,
            query_timeout: Duration::from_secs(config.query_timeout_secs),
        }
    }

    /// Builds the full report for `services` (optionally filtered by region)
    /// with all windows anchored at `now`. Store queries fan out with bounded
    /// concurrency; a failed or timed-out service lands in `failures` instead
    /// of aborting the batch. An empty cohort yields `None` per window in
    /// `overall_uptime`, never a mean over zero elements.
    pub async fn report(
        &self,
        services: &[Service],
        region: Option<&str>,
        now: DateTime<Utc>,
    ) -> UptimeReport {
        let windows = Window::standard(now);
        let filtered = filter_by_region(services, region);

        // Owned names keep the fan-out futures free of per-item borrows.
        let names: Vec<String> = filtered.iter().map(|s| s.name.clone()).collect();
        let results: Vec<(String, Result<BTreeMap<WindowLabel, f64>, ServiceQueryError>)> =
            futures_util::stream::iter(names.into_iter().map(|name| async move {
                let result =
                    match timeout(self.query_timeout, self.service_windows(&name, &windows)).await
                    {
                        Ok(Ok(stats)) => Ok(stats),
                        Ok(Err(e)) => Err(ServiceQueryError::Store(e)),
                        Err(_) => Err(ServiceQueryError::Timeout(self.query_timeout)),
                    };
                (name, result)
            }))
            .buffer_unordered(self.max_concurrent_queries.max(1))
            .collect()
            .await;

        let mut uptime_stats = BTreeMap::new();
        let mut failures = BTreeMap::new();
        for (name, result) in results {
            match result {
                Ok(stats) => {
                    uptime_stats.insert(name, stats);
                }
                Err(e) => {
                    tracing::warn!(service = %name, error = %e, "uptime query failed");
                    failures.insert(name, e.to_string());
                }
            }
        }

        let mut overall_uptime = BTreeMap::new();
        for label in WindowLabel::ALL {
            let values: Vec<f64> = uptime_stats
                .values()
                .filter_map(|stats| stats.get(&label).copied())
                .collect();
            let mean = if values.is_empty() {
                None
            } else {
                Some(aggregation::round2(
                    values.iter().sum::<f64>() / values.len() as f64,
                ))
            };
            overall_uptime.insert(label, mean);
        }

        UptimeReport {
            uptime_stats,
            overall_uptime,
            failures,
        }
    }

    /// Percentages for one service across all windows. Fetches the event
    /// history once for the longest window and slices it for the shorter
    /// ones; all windows share the same upper bound, so one query is both
    /// cheaper and self-consistent.
    async fn service_windows(
        &self,
        service: &str,
        windows: &[Window],
    ) -> anyhow::Result<BTreeMap<WindowLabel, f64>> {
        let base_start = windows.iter().map(|w| w.start).min().unwrap_or(0);
        let history = self.repo.events_from(service, base_start).await?;
        let base_status = self
            .repo
            .most_recent_event_before(service, base_start)
            .await?
            .map(|e| e.status)
            .unwrap_or(ServiceStatus::Up);

        let mut out = BTreeMap::new();
        for window in windows {
            // Events exactly at the window start are in-window.
            let split = history.partition_point(|e| e.timestamp < window.start);
            let pre_window_status = history[..split]
                .last()
                .map(|e| e.status)
                .unwrap_or(base_status);
            let downtime = aggregation::downtime_in_window(
                &history[split..],
                pre_window_status,
                window.start,
                window.end,
            );
            out.insert(
                window.label,
                aggregation::uptime_percent(downtime, window.start, window.end),
            );
        }
        Ok(out)
    }
}

/// Case-insensitive exact region match; `None` keeps all services.
pub fn filter_by_region<'a>(services: &'a [Service], region: Option<&str>) -> Vec<&'a Service> {
    services
        .iter()
        .filter(|s| region.is_none_or(|r| s.region.eq_ignore_ascii_case(r)))
        .collect()
}
