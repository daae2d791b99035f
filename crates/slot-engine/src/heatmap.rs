//! Heatmap projection -- aggregated UTC availability re-expressed in a
//! viewer's zone, keyed by local date and local `HH:MM` label.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use crate::aggregate::SlotAvailability;
use crate::dst::DstPolicy;
use crate::error::{Result, SlotError};
use crate::grid::generate_grid_with_policy;
use crate::timezone::{localize, parse_zone, to_local};
use crate::window::MeetingWindow;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

pub const DATE_LABEL_FORMAT: &str = "%Y-%m-%d";
pub const TIME_LABEL_FORMAT: &str = "%H:%M";

/// One slot as seen from the viewer's zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub date_label: String,
    pub time_label: String,
    pub available_count: usize,
    pub total_participants: usize,
    pub percentage: f64,
    pub level: u8,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
}

/// Availability grid for one viewer zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    /// Local dates, chronological.
    pub dates: Vec<String>,
    /// Local time-of-day labels across all dates, ascending and deduplicated.
    pub time_labels: Vec<String>,
    /// `date label -> time label -> cell`.
    pub cells: BTreeMap<String, BTreeMap<String, HeatmapCell>>,
    pub time_zone: String,
}

impl Heatmap {
    pub fn cell(&self, date_label: &str, time_label: &str) -> Option<&HeatmapCell> {
        self.cells.get(date_label)?.get(time_label)
    }

    /// Total number of cells across all dates.
    pub fn len(&self) -> usize {
        self.cells.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// `available / total * 100`, rounded half-to-even to one decimal.
/// Zero participants give 0.0.
pub fn availability_percentage(available: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (available as f64 * 1000.0 / total as f64).round_ties_even() / 10.0
}

/// Intensity tier for a rounded percentage.
///
/// | percentage | level |
/// |------------|-------|
/// | 0          | 0     |
/// | (0, 20)    | 1     |
/// | [20, 40)   | 2     |
/// | [40, 60)   | 3     |
/// | [60, 80)   | 4     |
/// | [80, 100]  | 5     |
pub fn heatmap_level(percentage: f64) -> u8 {
    if percentage >= 80.0 {
        5
    } else if percentage >= 60.0 {
        4
    } else if percentage >= 40.0 {
        3
    } else if percentage >= 20.0 {
        2
    } else if percentage > 0.0 {
        1
    } else {
        0
    }
}

/// Project aggregated slots into `viewer_zone`.
///
/// When two slots land on the same local label (the repeated fall-back hour)
/// the earlier slot keeps the cell.
///
/// # Errors
/// Returns `SlotError::InvalidZone` if `viewer_zone` is unknown.
pub fn project(aggregated: &[SlotAvailability], viewer_zone: &str) -> Result<Heatmap> {
    let tz = parse_zone(viewer_zone)?;

    let mut cells: BTreeMap<String, BTreeMap<String, HeatmapCell>> = BTreeMap::new();
    let mut time_labels: BTreeSet<String> = BTreeSet::new();

    for availability in aggregated {
        let local = to_local(availability.slot.start, &tz);
        let date_label = local.format(DATE_LABEL_FORMAT).to_string();
        let time_label = local.format(TIME_LABEL_FORMAT).to_string();
        let percentage = availability.percentage();

        let cell = HeatmapCell {
            date_label: date_label.clone(),
            time_label: time_label.clone(),
            available_count: availability.available_count,
            total_participants: availability.total_participants,
            percentage,
            level: heatmap_level(percentage),
            start_utc: availability.slot.start,
            end_utc: availability.slot.end,
        };

        time_labels.insert(time_label.clone());
        match cells.entry(date_label).or_default().entry(time_label) {
            Entry::Vacant(slot) => {
                slot.insert(cell);
            }
            Entry::Occupied(mut slot) => {
                if cell.start_utc < slot.get().start_utc {
                    slot.insert(cell);
                }
            }
        }
    }

    tracing::debug!(
        zone = viewer_zone,
        dates = cells.len(),
        times = time_labels.len(),
        "projected heatmap"
    );

    Ok(Heatmap {
        dates: cells.keys().cloned().collect(),
        time_labels: time_labels.into_iter().collect(),
        cells,
        time_zone: viewer_zone.to_string(),
    })
}

/// Project a window's aggregation, or its empty shape when nothing has been
/// aggregated yet.
///
/// With an empty `aggregated`, every grid slot is reported with zero
/// available, zero participants, and level 0, so dates and time labels still
/// reflect the window.
///
/// # Errors
/// Propagates window validation errors and `SlotError::InvalidZone` for the
/// viewer zone.
pub fn project_window(
    window: &MeetingWindow,
    aggregated: &[SlotAvailability],
    viewer_zone: &str,
    policy: DstPolicy,
) -> Result<Heatmap> {
    if !aggregated.is_empty() {
        return project(aggregated, viewer_zone);
    }

    let grid = generate_grid_with_policy(window, policy)?;
    let placeholders: Vec<SlotAvailability> = grid
        .iter()
        .map(|slot| SlotAvailability {
            slot,
            available_count: 0,
            total_participants: 0,
        })
        .collect();
    project(&placeholders, viewer_zone)
}

/// Recover the UTC instant behind a cell's date and time labels in `zone`.
///
/// # Errors
/// Returns `SlotError::InvalidZone` for an unknown zone and
/// `SlotError::InvalidTimestamp` for labels that do not parse or name a
/// local time that does not exist.
pub fn label_to_utc(date_label: &str, time_label: &str, zone: &str) -> Result<DateTime<Utc>> {
    let tz = parse_zone(zone)?;
    let invalid = |reason: &str| SlotError::InvalidTimestamp {
        input: format!("{} {}", date_label, time_label),
        reason: reason.to_string(),
    };

    let date = NaiveDate::parse_from_str(date_label, DATE_LABEL_FORMAT)
        .map_err(|e| invalid(&e.to_string()))?;
    let time = NaiveTime::parse_from_str(time_label, TIME_LABEL_FORMAT)
        .map_err(|e| invalid(&e.to_string()))?;

    localize(date.and_time(time), &tz, DstPolicy::Skip)
        .ok_or_else(|| invalid("local time does not exist in zone"))
}
