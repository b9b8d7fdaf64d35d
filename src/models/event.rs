// Status-change events and downtime intervals

use serde::{Deserialize, Serialize};

use super::ServiceStatus;

/// One observed up/down transition. Immutable once written; ordered by
/// `timestamp` (unix millis) ascending within a service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeEvent {
    pub service_name: String,
    pub status: ServiceStatus,
    /// Unix millis.
    pub timestamp: i64,
    pub response_time_millis: i64,
    pub location: String,
    pub region: String,
}

/// One continuous down period (unix millis, inclusive bounds). Display only;
/// percentage math never goes through intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DowntimeInterval {
    pub start: i64,
    pub end: i64,
}
