// Pairing: turn per-service down->up transitions into raw intervals.
// Merging across services stays in uptime::intervals.

use crate::models::{DowntimeInterval, ServiceStatus, StatusChangeEvent};

/// Pairs down->up transitions into raw `{start, end}` intervals. Input must
/// be ordered by service name then timestamp ascending (the store's location
/// query order). A down period still open when the events run out, or when
/// the walk moves to the next service, closes at `range_end`. Duplicate
/// consecutive downs keep the earlier start.
pub fn pair_transitions(events: &[StatusChangeEvent], range_end: i64) -> Vec<DowntimeInterval> {
    let mut out = Vec::new();
    let mut open: Option<(&str, i64)> = None;

    for event in events {
        if let Some((service, start)) = open
            && service != event.service_name
        {
            out.push(DowntimeInterval {
                start,
                end: range_end,
            });
            open = None;
        }
        match event.status {
            ServiceStatus::Down => {
                if open.is_none() {
                    open = Some((&event.service_name, event.timestamp));
                }
            }
            ServiceStatus::Up => {
                if let Some((_, start)) = open.take() {
                    out.push(DowntimeInterval {
                        start,
                        end: event.timestamp,
                    });
                }
            }
        }
    }
    if let Some((_, start)) = open {
        out.push(DowntimeInterval {
            start,
            end: range_end,
        });
    }
    out
}
