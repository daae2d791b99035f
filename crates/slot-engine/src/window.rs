//! The leader-defined search space for a meeting.

use crate::error::{Result, SlotError};
use crate::timezone::parse_zone;
use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Dates, work hours, and granularity to search for a meeting time.
///
/// Dates and work hours are local to `time_zone`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingWindow {
    /// IANA zone the window is declared in.
    pub time_zone: String,
    pub date_range_start: NaiveDate,
    /// Inclusive.
    pub date_range_end: NaiveDate,
    pub work_hours_start: NaiveTime,
    /// Exclusive: no slot may end after this time.
    pub work_hours_end: NaiveTime,
    /// Distance between consecutive slot starts.
    pub step_minutes: u32,
    /// Length of each candidate slot.
    pub duration_minutes: u32,
    /// Skip Saturdays and Sundays.
    pub work_days_only: bool,
}

impl MeetingWindow {
    /// Check the invariants the engine relies on and resolve the zone.
    ///
    /// Reversed date or work-hour ranges pass: they describe an empty grid,
    /// not a malformed window.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidZone` for an unknown zone and
    /// `SlotError::InvalidWindow` for a zero step or duration.
    pub fn validate(&self) -> Result<Tz> {
        let tz = parse_zone(&self.time_zone)?;
        if self.step_minutes == 0 {
            return Err(SlotError::InvalidWindow(
                "step_minutes must be positive".to_string(),
            ));
        }
        if self.duration_minutes == 0 {
            return Err(SlotError::InvalidWindow(
                "duration_minutes must be positive".to_string(),
            ));
        }
        Ok(tz)
    }

    /// True when the window cannot produce any slot regardless of step or
    /// duration.
    pub fn is_degenerate(&self) -> bool {
        self.date_range_end < self.date_range_start || self.work_hours_end <= self.work_hours_start
    }
}
