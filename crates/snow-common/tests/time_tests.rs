//! Tests for CF time decoding and frame naming.

use chrono::{TimeZone, Utc};
use snow_common::time::{frame_stem, select_time_of_day, CfTimeUnits, TimeUnit};

// ============================================================================
// CfTimeUnits::parse tests
// ============================================================================

#[test]
fn test_parse_hours_since() {
    let units = CfTimeUnits::parse("hours since 2019-10-01 00:00:00").unwrap();
    assert_eq!(units.unit, TimeUnit::Hours);
    assert_eq!(units.epoch, Utc.with_ymd_and_hms(2019, 10, 1, 0, 0, 0).unwrap());
}

#[test]
fn test_parse_with_offset() {
    let units = CfTimeUnits::parse("minutes since 2019-10-01 00:00:00-06:00").unwrap();
    assert_eq!(units.unit, TimeUnit::Minutes);
    assert_eq!(units.epoch, Utc.with_ymd_and_hms(2019, 10, 1, 6, 0, 0).unwrap());
}

#[test]
fn test_parse_rfc3339_and_date_only() {
    let rfc = CfTimeUnits::parse("seconds since 2020-01-01T00:00:00Z").unwrap();
    assert_eq!(rfc.epoch, Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());

    let date = CfTimeUnits::parse("days since 1970-01-01").unwrap();
    assert_eq!(date.unit, TimeUnit::Days);
    assert_eq!(date.epoch, Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap());
}

#[test]
fn test_parse_rejects_garbage() {
    assert!(CfTimeUnits::parse("hours").is_err());
    assert!(CfTimeUnits::parse("fortnights since 2020-01-01").is_err());
    assert!(CfTimeUnits::parse("hours since yesterday").is_err());
}

// ============================================================================
// decode tests
// ============================================================================

#[test]
fn test_decode_hours() {
    let units = CfTimeUnits::parse("hours since 2019-10-01 00:00:00").unwrap();
    let t = units.decode(22.0).unwrap();
    assert_eq!(t, Utc.with_ymd_and_hms(2019, 10, 1, 22, 0, 0).unwrap());

    let t = units.decode(46.0).unwrap();
    assert_eq!(t, Utc.with_ymd_and_hms(2019, 10, 2, 22, 0, 0).unwrap());
}

#[test]
fn test_decode_fractional_days() {
    let units = CfTimeUnits::parse("days since 2020-03-01").unwrap();
    let t = units.decode(1.5).unwrap();
    assert_eq!(t, Utc.with_ymd_and_hms(2020, 3, 2, 12, 0, 0).unwrap());
}

#[test]
fn test_decode_rejects_nan() {
    let units = CfTimeUnits::parse("hours since 2019-10-01").unwrap();
    assert!(units.decode(f64::NAN).is_err());
}

#[test]
fn test_decode_out_of_calendar_range_is_error() {
    let units = CfTimeUnits::parse("hours since 2019-10-01 00:00:00").unwrap();
    // about 114 million years
    assert!(units.decode(1.0e12).is_err());
    assert!(units.decode(-1.0e12).is_err());
    // past the millisecond range entirely
    assert!(units.decode(1.0e300).is_err());
}

// ============================================================================
// frame naming and selection
// ============================================================================

#[test]
fn test_frame_stem() {
    let t = Utc.with_ymd_and_hms(2020, 4, 7, 22, 0, 0).unwrap();
    assert_eq!(frame_stem(&t), "20200407");
}

#[test]
fn test_select_time_of_day() {
    let times: Vec<_> = (0..72)
        .map(|h| Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::hours(h))
        .collect();
    let selected = select_time_of_day(&times, 22);
    assert_eq!(selected, vec![22, 46, 70]);
}

#[test]
fn test_select_time_of_day_ignores_partial_hours() {
    let times = vec![
        Utc.with_ymd_and_hms(2020, 1, 1, 22, 30, 0).unwrap(),
        Utc.with_ymd_and_hms(2020, 1, 2, 22, 0, 0).unwrap(),
    ];
    assert_eq!(select_time_of_day(&times, 22), vec![1]);
}
