// Downtime interval union for the history display.

use crate::models::DowntimeInterval;

/// Collapses discrete downtime intervals into merged contiguous intervals,
/// sorted chronologically. Touching intervals (`end == next.start`) merge.
/// Idempotent, and insensitive to input order.
pub fn merge_intervals(mut intervals: Vec<DowntimeInterval>) -> Vec<DowntimeInterval> {
    intervals.sort_by_key(|iv| (iv.start, iv.end));

    let mut merged: Vec<DowntimeInterval> = Vec::with_capacity(intervals.len());
    for iv in intervals {
        match merged.last_mut() {
            Some(last) if iv.start <= last.end => {
                last.end = last.end.max(iv.end);
            }
            _ => merged.push(iv),
        }
    }
    merged
}
