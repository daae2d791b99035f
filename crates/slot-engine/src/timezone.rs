//! Time normalization -- timestamp strings and local wall-clock values to UTC.
//!
//! Two entry points with deliberately different inputs:
//!
//! - [`normalize`] takes an ISO 8601 *string*. Strings carrying an offset (or a
//!   `Z` marker) are reprojected to UTC; naive strings are read as UTC
//!   wall-clock. The zone argument is validated but never used to reinterpret
//!   a naive string.
//! - [`localize`] takes a typed local wall-clock value and a zone, and applies
//!   civil-time rules (DST gaps and overlaps) to find the UTC instant. The grid
//!   generator uses this for work hours.

use crate::dst::DstPolicy;
use crate::error::{Result, SlotError};
use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;

/// Accepted layouts for timestamps that carry a UTC offset.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
];

/// Accepted layouts for naive timestamps.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Display layout used by [`format_for_zone`].
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parse an IANA zone identifier (e.g. "Asia/Ho_Chi_Minh", "UTC").
///
/// # Errors
/// Returns `SlotError::InvalidZone` if the name is not in the tz database.
pub fn parse_zone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| SlotError::InvalidZone(name.to_string()))
}

/// Normalize a timestamp string to an absolute UTC instant.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM[:SS[.fff]]` with an optional
/// `Z`, `±HH:MM` or `±HH` suffix; a space may stand in for the `T`. Naive input is read
/// as UTC wall-clock.
///
/// # Errors
/// Returns `SlotError::InvalidZone` if `zone` is unknown (checked first), and
/// `SlotError::InvalidTimestamp` if the string matches none of the layouts.
pub fn normalize(timestamp: &str, zone: &str) -> Result<DateTime<Utc>> {
    parse_zone(zone)?;
    parse_timestamp(timestamp)
}

/// Parse a timestamp string without validating any zone. See [`normalize`].
pub fn parse_timestamp(timestamp: &str) -> Result<DateTime<Utc>> {
    let invalid = |reason: &str| SlotError::InvalidTimestamp {
        input: timestamp.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = timestamp.trim();
    if trimmed.is_empty() {
        return Err(invalid("empty timestamp"));
    }

    let mut s = trimmed.to_string();
    if s.len() > 10 && s.as_bytes()[10] == b' ' {
        s.replace_range(10..11, "T");
    }
    if let Some(stripped) = s.strip_suffix(&['Z', 'z'][..]) {
        s = format!("{}+00:00", stripped);
    }
    if has_hour_only_offset(&s) {
        s.push_str(":00");
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&s, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(&s, fmt) {
            return Ok(ndt.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(invalid("expected ISO 8601 date, time and optional offset"))
}

/// `...T09:00:00+07`: a time part ending in a sign and two digits.
fn has_hour_only_offset(s: &str) -> bool {
    let b = s.as_bytes();
    let n = b.len();
    n > 13
        && b[10] == b'T'
        && matches!(b[n - 3], b'+' | b'-')
        && b[n - 2].is_ascii_digit()
        && b[n - 1].is_ascii_digit()
}

/// Convert a local wall-clock datetime in `tz` to a UTC instant.
///
/// Ambiguous times (the repeated hour at fall-back) resolve to the earliest
/// instant. Nonexistent times (the spring-forward gap) follow `policy`:
/// `Skip` returns `None`, `ShiftForward` applies the pre-transition offset.
pub fn localize(local: NaiveDateTime, tz: &Tz, policy: DstPolicy) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => match policy {
            DstPolicy::Skip => None,
            DstPolicy::ShiftForward => {
                // Transitions are months apart, so a day earlier is safely
                // on the old side of the gap.
                let before = tz
                    .offset_from_utc_datetime(&(local - Duration::days(1)))
                    .fix();
                let shifted = local - Duration::seconds(i64::from(before.local_minus_utc()));
                Some(shifted.and_utc())
            }
        },
    }
}

/// Local wall-clock reading of `instant` in `tz`.
pub fn to_local(instant: DateTime<Utc>, tz: &Tz) -> NaiveDateTime {
    instant.with_timezone(tz).naive_local()
}

/// Format a UTC instant for display in `zone` as `YYYY-MM-DD HH:MM`.
///
/// # Errors
/// Returns `SlotError::InvalidZone` if `zone` is unknown.
pub fn format_for_zone(instant: DateTime<Utc>, zone: &str) -> Result<String> {
    let tz = parse_zone(zone)?;
    Ok(to_local(instant, &tz).format(DISPLAY_FORMAT).to_string())
}
