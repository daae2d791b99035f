//! Candidate slot generation -- meeting window to an ordered grid of UTC slots.
//!
//! Walks every calendar day of the window in the window's own zone, and within
//! each day steps through work hours emitting slots that fit entirely before
//! the end of work hours. Slots are produced lazily; a [`Grid`] can be
//! iterated any number of times.

use crate::dst::DstPolicy;
use crate::error::Result;
use crate::timezone::localize;
use crate::window::MeetingWindow;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// One point in the search grid at which the meeting could start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CandidateSlot {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// A validated, restartable grid over a [`MeetingWindow`].
#[derive(Debug, Clone)]
pub struct Grid {
    window: MeetingWindow,
    tz: Tz,
    policy: DstPolicy,
}

impl Grid {
    pub fn window(&self) -> &MeetingWindow {
        &self.window
    }

    pub fn time_zone(&self) -> Tz {
        self.tz
    }

    pub fn dst_policy(&self) -> DstPolicy {
        self.policy
    }

    /// Start a fresh pass over the grid.
    pub fn iter(&self) -> GridIter<'_> {
        let day = if self.window.is_degenerate() {
            None
        } else {
            Some(self.window.date_range_start)
        };
        GridIter {
            grid: self,
            day,
            offset_minutes: 0,
        }
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = CandidateSlot;
    type IntoIter = GridIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy iterator over the slots of a [`Grid`].
#[derive(Debug, Clone)]
pub struct GridIter<'a> {
    grid: &'a Grid,
    /// Day currently being walked; `None` once exhausted.
    day: Option<NaiveDate>,
    /// Minutes past work-hours start of the next slot on `day`.
    offset_minutes: i64,
}

impl GridIter<'_> {
    fn next_day(&mut self) {
        self.day = self.day.and_then(|d| d.succ_opt());
        self.offset_minutes = 0;
    }
}

impl Iterator for GridIter<'_> {
    type Item = CandidateSlot;

    fn next(&mut self) -> Option<CandidateSlot> {
        let window = &self.grid.window;
        let step = i64::from(window.step_minutes);
        let duration = Duration::minutes(i64::from(window.duration_minutes));

        while let Some(day) = self.day {
            if day > window.date_range_end {
                self.day = None;
                break;
            }
            if window.work_days_only && is_weekend(day) {
                self.next_day();
                continue;
            }

            let start_local =
                day.and_time(window.work_hours_start) + Duration::minutes(self.offset_minutes);
            let work_end = day.and_time(window.work_hours_end);

            // No truncated slots: the whole slot must fit inside work hours.
            if start_local + duration > work_end {
                self.next_day();
                continue;
            }
            self.offset_minutes += step;

            if let Some(start) = localize(start_local, &self.grid.tz, self.grid.policy) {
                return Some(CandidateSlot {
                    start,
                    end: start + duration,
                });
            }
        }

        None
    }
}

fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Build the candidate grid for a meeting window with the default DST policy.
///
/// # Errors
/// Returns `SlotError::InvalidZone` or `SlotError::InvalidWindow` when the
/// window fails [`MeetingWindow::validate`]. Reversed ranges are not errors;
/// they produce an empty grid.
pub fn generate_grid(window: &MeetingWindow) -> Result<Grid> {
    generate_grid_with_policy(window, DstPolicy::default())
}

/// Build the candidate grid, choosing how DST-gap start times are handled.
pub fn generate_grid_with_policy(window: &MeetingWindow, policy: DstPolicy) -> Result<Grid> {
    let tz = window.validate()?;
    tracing::debug!(
        zone = %tz.name(),
        start = %window.date_range_start,
        end = %window.date_range_end,
        step = window.step_minutes,
        duration = window.duration_minutes,
        "built candidate grid"
    );
    Ok(Grid {
        window: window.clone(),
        tz,
        policy,
    })
}
