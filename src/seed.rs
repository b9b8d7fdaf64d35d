// Seed data: one 24h down/up pair per service just inside each trailing
// window, for exercising the aggregation end to end without a prober.

use chrono::{DateTime, Utc};

use crate::models::{Service, ServiceStatus, StatusChangeEvent};
use crate::uptime::{Window, WindowLabel, aggregation};

const DAY_MS: i64 = 86_400_000;

/// Builds the seed events for `services`, anchored at `now`: for each window
/// boundary, a `down` one day after the boundary and the matching `up` a day
/// later. The twelve-month window therefore contains three pairs, the
/// six-month two, the three-month one.
pub fn seed_events(services: &[Service], now: DateTime<Utc>) -> Vec<StatusChangeEvent> {
    let mut out = Vec::with_capacity(services.len() * 6);
    for window in Window::standard(now) {
        for service in services {
            let down_ts = window.start + DAY_MS;
            let up_ts = window.start + 2 * DAY_MS;
            out.push(seed_event(service, ServiceStatus::Down, down_ts));
            out.push(seed_event(service, ServiceStatus::Up, up_ts));
        }
    }
    out.sort_by_key(|e| e.timestamp);
    out
}

/// Uptime percentage the seed data should produce for one window: the
/// three/six/twelve-month windows contain one/two/three seeded downtime days.
/// Compare with a tolerance (window spans drift between seed time and report
/// time), not exact equality.
pub fn expected_uptime(label: WindowLabel, now: DateTime<Utc>) -> f64 {
    let window = Window::trailing(label, now);
    let pairs: i64 = match label {
        WindowLabel::ThreeMonth => 1,
        WindowLabel::SixMonth => 2,
        WindowLabel::TwelveMonth => 3,
    };
    aggregation::uptime_percent(pairs * DAY_MS, window.start, window.end)
}

fn seed_event(service: &Service, status: ServiceStatus, timestamp: i64) -> StatusChangeEvent {
    StatusChangeEvent {
        service_name: service.name.clone(),
        status,
        timestamp,
        // Deterministic stand-in for a measured latency.
        response_time_millis: 100 + (timestamp % 1300),
        location: service.location.clone(),
        region: service.region.clone(),
    }
}
