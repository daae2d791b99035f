//! Tests for timestamp normalization, local-time conversion, and display
//! formatting.

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use slot_engine::timezone::{format_for_zone, localize, normalize, parse_zone};
use slot_engine::{DstPolicy, SlotError};

fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, 0)
        .unwrap()
}

// ── normalize ───────────────────────────────────────────────────────────────

#[test]
fn naive_timestamp_is_read_as_utc_regardless_of_zone() {
    // The zone only gets validated; naive input is UTC wall-clock.
    let dt = normalize("2024-01-01T09:00:00", "Asia/Ho_Chi_Minh").unwrap();
    assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
}

#[test]
fn z_suffix_is_utc() {
    let dt = normalize("2024-01-01T09:00:00Z", "UTC").unwrap();
    assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
}

#[test]
fn offset_timestamp_is_reprojected_to_utc() {
    // 09:00 at +07:00 is 02:00 UTC.
    let dt = normalize("2024-01-01T09:00:00+07:00", "America/New_York").unwrap();
    assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap());
}

#[test]
fn negative_offset_crosses_into_next_day() {
    let dt = normalize("2024-01-01T20:30:00-05:00", "UTC").unwrap();
    assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 2, 1, 30, 0).unwrap());
}

#[test]
fn hour_only_offset_is_accepted() {
    assert_eq!(
        normalize("2024-01-01T09:00:00+07", "UTC").unwrap(),
        Utc.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap()
    );
    assert_eq!(
        normalize("2024-01-01T09:00-05", "UTC").unwrap(),
        Utc.with_ymd_and_hms(2024, 1, 1, 14, 0, 0).unwrap()
    );
    // A date-only string ends in "-DD" but is not an offset.
    assert_eq!(
        normalize("2024-01-15", "UTC").unwrap(),
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
    );
}

#[test]
fn minutes_precision_and_fractional_seconds_are_accepted() {
    assert_eq!(
        normalize("2024-01-01T09:00", "UTC").unwrap(),
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    );
    assert_eq!(
        normalize("2024-01-01T09:00+02:00", "UTC").unwrap(),
        Utc.with_ymd_and_hms(2024, 1, 1, 7, 0, 0).unwrap()
    );
    let with_millis = normalize("2024-01-01T09:00:00.250Z", "UTC").unwrap();
    assert_eq!(with_millis.timestamp_subsec_millis(), 250);
}

#[test]
fn date_only_is_midnight_utc() {
    let dt = normalize("2024-03-15", "UTC").unwrap();
    assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap());
}

#[test]
fn unknown_zone_is_rejected_before_parsing() {
    let err = normalize("not-a-date", "Invalid/Timezone").unwrap_err();
    assert_eq!(err, SlotError::InvalidZone("Invalid/Timezone".to_string()));
}

#[test]
fn garbage_timestamp_is_rejected() {
    let err = normalize("invalid-date", "UTC").unwrap_err();
    assert!(matches!(err, SlotError::InvalidTimestamp { ref input, .. } if input == "invalid-date"));
}

#[test]
fn out_of_range_fields_are_rejected() {
    assert!(matches!(
        normalize("2024-13-01T09:00:00", "UTC"),
        Err(SlotError::InvalidTimestamp { .. })
    ));
    assert!(matches!(
        normalize("2024-01-01T25:00:00", "UTC"),
        Err(SlotError::InvalidTimestamp { .. })
    ));
}

// ── parse_zone ──────────────────────────────────────────────────────────────

#[test]
fn common_zones_parse() {
    for name in ["UTC", "Asia/Ho_Chi_Minh", "America/New_York", "Europe/London"] {
        assert!(parse_zone(name).is_ok(), "{} should parse", name);
    }
}

#[test]
fn empty_zone_is_invalid() {
    assert!(matches!(parse_zone(""), Err(SlotError::InvalidZone(_))));
}

// ── localize ────────────────────────────────────────────────────────────────

#[test]
fn localize_plain_winter_time() {
    let tz = parse_zone("America/New_York").unwrap();
    let utc = localize(local(2024, 1, 1, 9, 0), &tz, DstPolicy::default()).unwrap();
    assert_eq!(utc, Utc.with_ymd_and_hms(2024, 1, 1, 14, 0, 0).unwrap());
}

#[test]
fn localize_summer_time_uses_dst_offset() {
    let tz = parse_zone("America/New_York").unwrap();
    let utc = localize(local(2024, 7, 1, 9, 0), &tz, DstPolicy::default()).unwrap();
    assert_eq!(utc, Utc.with_ymd_and_hms(2024, 7, 1, 13, 0, 0).unwrap());
}

#[test]
fn localize_gap_with_skip_returns_none() {
    // 2024-03-10 02:30 does not exist in New York.
    let tz = parse_zone("America/New_York").unwrap();
    assert_eq!(localize(local(2024, 3, 10, 2, 30), &tz, DstPolicy::Skip), None);
}

#[test]
fn localize_gap_with_shift_forward_uses_pre_transition_offset() {
    // 02:30 read as EST (-05:00) is 07:30Z, which is 03:30 EDT.
    let tz = parse_zone("America/New_York").unwrap();
    let utc = localize(local(2024, 3, 10, 2, 30), &tz, DstPolicy::ShiftForward).unwrap();
    assert_eq!(utc, Utc.with_ymd_and_hms(2024, 3, 10, 7, 30, 0).unwrap());
}

#[test]
fn localize_ambiguous_time_picks_earliest_instant() {
    // 2024-11-03 01:30 happens twice in New York; the EDT one is 05:30Z.
    let tz = parse_zone("America/New_York").unwrap();
    let utc = localize(local(2024, 11, 3, 1, 30), &tz, DstPolicy::Skip).unwrap();
    assert_eq!(utc, Utc.with_ymd_and_hms(2024, 11, 3, 5, 30, 0).unwrap());
}

// ── format_for_zone ─────────────────────────────────────────────────────────

#[test]
fn format_in_utc() {
    let dt = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    assert_eq!(format_for_zone(dt, "UTC").unwrap(), "2024-01-01 09:00");
}

#[test]
fn format_converts_into_zone() {
    let dt = Utc.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap();
    assert_eq!(
        format_for_zone(dt, "Asia/Ho_Chi_Minh").unwrap(),
        "2024-01-01 09:00"
    );
}

#[test]
fn format_crosses_date_line() {
    // 03:00 UTC on Jan 1 is still Dec 31 evening in Los Angeles.
    let dt = Utc.with_ymd_and_hms(2024, 1, 1, 3, 0, 0).unwrap();
    assert_eq!(
        format_for_zone(dt, "America/Los_Angeles").unwrap(),
        "2023-12-31 19:00"
    );
}

#[test]
fn format_edge_of_day() {
    let late = Utc.with_ymd_and_hms(2024, 1, 1, 23, 59, 0).unwrap();
    let midnight = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(format_for_zone(late, "UTC").unwrap(), "2024-01-01 23:59");
    assert_eq!(format_for_zone(midnight, "UTC").unwrap(), "2024-01-01 00:00");
}

#[test]
fn format_rejects_unknown_zone() {
    let dt = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert!(matches!(
        format_for_zone(dt, "Mars/Olympus"),
        Err(SlotError::InvalidZone(_))
    ));
}
