// Window aggregation: pure downtime/uptime math over an ordered event slice.
// Store access (event queries, window fan-out) stays in uptime::mod.

use crate::models::{ServiceStatus, StatusChangeEvent};

/// Total downtime in `[window_start, now]` (unix millis) given the in-window
/// events in ascending timestamp order and the status in effect immediately
/// before the window (default `Up` when the service has no prior history).
///
/// Reacts only to the literal status of each event: duplicate consecutive
/// states are no-ops for duration purposes. Timestamps past `now` (clock skew)
/// are clamped to `now`; timestamps before the window start count from the
/// window start.
pub fn downtime_in_window(
    events: &[StatusChangeEvent],
    pre_window_status: ServiceStatus,
    window_start: i64,
    now: i64,
) -> i64 {
    if now <= window_start {
        return 0;
    }
    let mut last_status = pre_window_status;
    let mut last_ts = window_start;
    let mut downtime: i64 = 0;

    for event in events {
        let ts = event.timestamp.clamp(window_start, now);
        if last_status == ServiceStatus::Down {
            downtime += (ts - last_ts).max(0);
        }
        last_status = event.status;
        last_ts = last_ts.max(ts);
    }

    // The window may end while still down.
    if last_status == ServiceStatus::Down {
        downtime += (now - last_ts).max(0);
    }
    downtime
}

/// Uptime percentage for a window of `[window_start, now]` with the given
/// downtime, rounded to two decimals. A degenerate window (`now <=
/// window_start`) is defined as 100.00, never a division fault.
pub fn uptime_percent(downtime: i64, window_start: i64, now: i64) -> f64 {
    let span = now - window_start;
    if span <= 0 {
        return 100.0;
    }
    let downtime = downtime.clamp(0, span);
    round2(((span - downtime) as f64 / span as f64) * 100.0)
}

/// Round to two decimal places (percentages are reported fixed to two).
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
