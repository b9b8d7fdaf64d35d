// Trailing window boundary tests: calendar-month arithmetic, labels

use chrono::{DateTime, TimeZone, Utc};
use statuswatch::uptime::{Window, WindowLabel};

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

#[test]
fn three_months_back_is_calendar_months_not_90_days() {
    let now = at(2026, 8, 29);
    let w = Window::trailing(WindowLabel::ThreeMonth, now);
    assert_eq!(w.start, at(2026, 5, 29).timestamp_millis());
    assert_eq!(w.end, now.timestamp_millis());
}

#[test]
fn month_subtraction_rolls_over_the_year() {
    let now = at(2026, 1, 15);
    let w = Window::trailing(WindowLabel::SixMonth, now);
    assert_eq!(w.start, at(2025, 7, 15).timestamp_millis());
}

#[test]
fn twelve_months_back_is_previous_year_same_date() {
    let now = at(2026, 8, 29);
    let w = Window::trailing(WindowLabel::TwelveMonth, now);
    assert_eq!(w.start, at(2025, 8, 29).timestamp_millis());
}

#[test]
fn month_end_clamps_to_shorter_month() {
    // Three months before May 31 is Feb 28 (chrono clamps the day).
    let now = at(2026, 5, 31);
    let w = Window::trailing(WindowLabel::ThreeMonth, now);
    assert_eq!(w.start, at(2026, 2, 28).timestamp_millis());
}

#[test]
fn standard_windows_share_the_upper_bound() {
    let now = at(2026, 8, 29);
    let windows = Window::standard(now);
    assert_eq!(windows.len(), 3);
    for w in &windows {
        assert_eq!(w.end, now.timestamp_millis());
    }
    assert!(windows[0].start > windows[1].start);
    assert!(windows[1].start > windows[2].start);
}

#[test]
fn span_is_non_negative() {
    let now = at(2026, 8, 29);
    let w = Window::trailing(WindowLabel::ThreeMonth, now);
    assert!(w.span() > 0);
    let degenerate = Window {
        label: WindowLabel::ThreeMonth,
        start: w.end,
        end: w.end,
    };
    assert_eq!(degenerate.span(), 0);
}

#[test]
fn labels_serialize_camel_case() {
    assert_eq!(
        serde_json::to_string(&WindowLabel::ThreeMonth).unwrap(),
        "\"threeMonth\""
    );
    assert_eq!(
        serde_json::to_string(&WindowLabel::TwelveMonth).unwrap(),
        "\"twelveMonth\""
    );
}
