// Uptime report: per-service and overall percentages per trailing window.
// Derived fresh on each request; never persisted.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::uptime::WindowLabel;

/// Result of one aggregation request. `overall_uptime` holds `None` per window
/// when the region filter matched no services (or every service failed) so the
/// API reports `null` instead of a mean over zero elements.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UptimeReport {
    /// service name -> window label -> percentage (0-100, two decimals).
    pub uptime_stats: BTreeMap<String, BTreeMap<WindowLabel, f64>>,
    /// window label -> mean of all services' percentages, two decimals.
    pub overall_uptime: BTreeMap<WindowLabel, Option<f64>>,
    /// service name -> failure reason, for services whose store queries failed.
    /// One service failing never aborts the rest of the batch.
    pub failures: BTreeMap<String, String>,
}
