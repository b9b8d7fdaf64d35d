// Trailing window boundaries. One shared function for all call sites so the
// statistics view and the history view can never drift apart on date math.

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

/// The three standard trailing windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WindowLabel {
    ThreeMonth,
    SixMonth,
    TwelveMonth,
}

impl WindowLabel {
    pub const ALL: [WindowLabel; 3] = [
        WindowLabel::ThreeMonth,
        WindowLabel::SixMonth,
        WindowLabel::TwelveMonth,
    ];

    pub fn months(self) -> u32 {
        match self {
            WindowLabel::ThreeMonth => 3,
            WindowLabel::SixMonth => 6,
            WindowLabel::TwelveMonth => 12,
        }
    }
}

/// One trailing window: `[start, end]` in unix millis, `end` = now at the
/// moment of the request. Computed fresh per request, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub label: WindowLabel,
    pub start: i64,
    pub end: i64,
}

impl Window {
    /// Window ending at `now` whose start is `now` minus N calendar months
    /// (twelve months = one calendar year; chrono clamps Feb 29 to Feb 28).
    /// Not a fixed day offset: "three months before Mar 31" is Dec 31.
    pub fn trailing(label: WindowLabel, now: DateTime<Utc>) -> Window {
        let start = now
            .checked_sub_months(Months::new(label.months()))
            .unwrap_or(now);
        Window {
            label,
            start: start.timestamp_millis(),
            end: now.timestamp_millis(),
        }
    }

    /// All three standard windows, sharing `now` as their upper bound.
    pub fn standard(now: DateTime<Utc>) -> [Window; 3] {
        WindowLabel::ALL.map(|label| Window::trailing(label, now))
    }

    /// Window span in millis (zero for a degenerate window).
    pub fn span(&self) -> i64 {
        (self.end - self.start).max(0)
    }
}
