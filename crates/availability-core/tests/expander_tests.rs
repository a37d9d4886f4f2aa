//! Tests for recurrence expansion.

use availability_core::expander::{expand, expand_within, Recurrence, DEFAULT_HORIZON_DAYS};
use availability_core::interval::TimeInterval;
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc, Weekday};

/// 09:00–11:00 UTC on the given March 2026 day.
fn morning(day: u32) -> TimeInterval {
    TimeInterval::new(
        Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 3, day, 11, 0, 0).unwrap(),
    )
    .unwrap()
}

#[test]
fn none_yields_base_only() {
    assert_eq!(expand(morning(20), Recurrence::None), vec![morning(20)]);
}

#[test]
fn weekdays_from_friday_skips_weekends() {
    // 2026-03-20 is a Friday. [Mar 20, Apr 19) holds 21 weekdays.
    let expanded = expand(morning(20), Recurrence::Weekdays);

    assert_eq!(expanded.len(), 21);
    assert_eq!(expanded[0], morning(20));
    // Saturday 21 and Sunday 22 are dropped; Monday 23 comes next.
    assert_eq!(expanded[1], morning(23));
    assert!(expanded
        .iter()
        .all(|iv| !matches!(iv.start().weekday(), Weekday::Sat | Weekday::Sun)));
}

#[test]
fn weekdays_from_monday_over_thirty_days() {
    // 2026-03-16 is a Monday. [Mar 16, Apr 15) holds 22 weekdays.
    assert_eq!(expand(morning(16), Recurrence::Weekdays).len(), 22);
}

#[test]
fn weekdays_stay_inside_horizon() {
    let base = morning(16);
    let horizon_end = base.start() + Duration::days(i64::from(DEFAULT_HORIZON_DAYS));
    let expanded = expand(base, Recurrence::Weekdays);
    assert!(expanded.iter().all(|iv| iv.start() < horizon_end));
}

#[test]
fn weekdays_output_is_ascending_and_keeps_duration() {
    let expanded = expand(morning(16), Recurrence::Weekdays);
    assert!(expanded.windows(2).all(|w| w[0] < w[1]));
    assert!(expanded.iter().all(|iv| iv.duration() == Duration::hours(2)));
}

#[test]
fn base_on_saturday_is_dropped_for_weekdays() {
    // 2026-03-21 is a Saturday: offset 0 is a weekend day, so it is not emitted.
    let expanded = expand(morning(21), Recurrence::Weekdays);
    assert_eq!(expanded.first(), Some(&morning(23)));
}

#[test]
fn custom_horizon_of_one_week() {
    let expanded = expand_within(morning(16), Recurrence::Weekdays, 7);
    assert_eq!(expanded.len(), 5);
    assert_eq!(expanded.last(), Some(&morning(20)));
}

#[test]
fn expansion_near_max_instant_stops_instead_of_overflowing() {
    let last = DateTime::<Utc>::MAX_UTC;
    let base = TimeInterval::new(last - Duration::days(3), last - Duration::days(2)).unwrap();

    let expanded = expand(base, Recurrence::Weekdays);
    assert!(expanded.len() <= 3);
    assert!(expanded.iter().all(|iv| iv.end() <= last));
}

#[test]
fn checked_shift_reports_overflow() {
    let last = DateTime::<Utc>::MAX_UTC;
    let base = TimeInterval::new(last - Duration::hours(2), last - Duration::hours(1)).unwrap();
    assert_eq!(base.checked_shift(Duration::days(1)), None);
    assert!(base.checked_shift(Duration::minutes(30)).is_some());
}

#[test]
fn expansion_is_deterministic() {
    assert_eq!(
        expand(morning(18), Recurrence::Weekdays),
        expand(morning(18), Recurrence::Weekdays)
    );
}

#[test]
fn recurrence_parses_case_insensitively() {
    assert_eq!("Weekdays".parse::<Recurrence>().unwrap(), Recurrence::Weekdays);
    assert_eq!("none".parse::<Recurrence>().unwrap(), Recurrence::None);
    assert!("fortnightly".parse::<Recurrence>().is_err());
}

#[test]
fn recurrence_deserializes_lowercase() {
    let r: Recurrence = serde_json::from_str(r#""weekdays""#).unwrap();
    assert_eq!(r, Recurrence::Weekdays);
}
