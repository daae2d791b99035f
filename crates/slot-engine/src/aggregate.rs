//! Availability aggregation -- how many participants are free for each slot.
//!
//! Every slot is evaluated independently against a read-only [`BusyIndex`],
//! so callers wanting throughput can fan [`aggregate_slot`] out over slots
//! with any map-style executor.

use crate::busy::BusyIndex;
use crate::dst::DstPolicy;
use crate::error::{Result, SlotError};
use crate::grid::{generate_grid_with_policy, CandidateSlot};
use crate::heatmap::{availability_percentage, heatmap_level};
use crate::window::MeetingWindow;
use serde::{Deserialize, Serialize};

/// Participant availability for one candidate slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAvailability {
    pub slot: CandidateSlot,
    /// In `0..=total_participants`.
    pub available_count: usize,
    pub total_participants: usize,
}

impl SlotAvailability {
    /// Share of participants available, 0.0-100.0 rounded to one decimal.
    pub fn percentage(&self) -> f64 {
        availability_percentage(self.available_count, self.total_participants)
    }

    /// Heatmap intensity 0-5.
    pub fn level(&self) -> u8 {
        heatmap_level(self.percentage())
    }
}

/// Count the participants free for a single slot.
///
/// A participant is free when none of their busy time overlaps the slot
/// (half-open). Declared participants missing from `busy` have no busy time
/// and are free. With zero participants the count is zero.
///
/// # Errors
/// Returns `SlotError::ParticipantMismatch` when `busy` holds more owners
/// than `total_participants`.
pub fn aggregate_slot(
    slot: CandidateSlot,
    busy: &BusyIndex,
    total_participants: usize,
) -> Result<SlotAvailability> {
    check_participants(busy, total_participants)?;
    Ok(count_slot(slot, busy, total_participants))
}

/// Aggregate availability over a whole grid, preserving grid order.
///
/// An empty grid yields an empty result.
///
/// # Errors
/// Returns `SlotError::ParticipantMismatch` when `busy` holds more owners
/// than `total_participants`.
pub fn aggregate<I>(
    grid: I,
    busy: &BusyIndex,
    total_participants: usize,
) -> Result<Vec<SlotAvailability>>
where
    I: IntoIterator<Item = CandidateSlot>,
{
    check_participants(busy, total_participants)?;
    let results: Vec<SlotAvailability> = grid
        .into_iter()
        .map(|slot| count_slot(slot, busy, total_participants))
        .collect();

    tracing::debug!(
        slots = results.len(),
        participants = total_participants,
        "aggregated slot availability"
    );
    Ok(results)
}

fn check_participants(busy: &BusyIndex, total_participants: usize) -> Result<()> {
    let owners = busy.owner_count();
    if owners > total_participants {
        return Err(SlotError::ParticipantMismatch {
            owners,
            total: total_participants,
        });
    }
    Ok(())
}

// Cannot underflow once `check_participants` has passed.
fn count_slot(
    slot: CandidateSlot,
    busy: &BusyIndex,
    total_participants: usize,
) -> SlotAvailability {
    SlotAvailability {
        slot,
        available_count: total_participants - busy.busy_owner_count(slot.start, slot.end),
        total_participants,
    }
}

/// Generate the window's grid and aggregate it against every registered
/// owner in `busy`.
///
/// # Errors
/// Propagates window validation errors from the grid generator.
pub fn aggregate_window(
    window: &MeetingWindow,
    busy: &BusyIndex,
    policy: DstPolicy,
) -> Result<Vec<SlotAvailability>> {
    let grid = generate_grid_with_policy(window, policy)?;
    aggregate(&grid, busy, busy.owner_count())
}

/// Ids of the owners in `busy` who are free for `slot`, in id order.
pub fn available_owners<'a>(slot: &CandidateSlot, busy: &'a BusyIndex) -> Vec<&'a str> {
    busy.owners()
        .filter(|owner| !busy.is_busy(owner, slot.start, slot.end))
        .collect()
}
