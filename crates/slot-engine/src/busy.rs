//! Participant busy intervals -- intake, validation, and the per-owner index
//! the aggregator queries.
//!
//! Busy intervals are half-open `[start, end)`: an interval ending exactly when
//! a slot starts does not block that slot. Each owner's intervals are kept
//! sorted and merged, so "is this owner busy during [a, b)" is a binary search.

use std::collections::BTreeMap;

use crate::error::{Result, SlotError};
use crate::timezone::{normalize, parse_zone};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A half-open time range during which one participant is unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub owner_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    /// # Errors
    /// Returns `SlotError::InvalidInterval` unless `end > start`.
    pub fn new(
        owner_id: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self> {
        if end <= start {
            return Err(SlotError::InvalidInterval { start, end });
        }
        Ok(Self {
            owner_id: owner_id.into(),
            start,
            end,
        })
    }

    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        overlaps(self.start, self.end, start, end)
    }
}

/// Two half-open intervals `[a, b)` and `[c, d)` overlap iff `a < d && c < b`.
///
/// Adjacent intervals (one ends exactly when the other starts) do not overlap.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// A busy record that was dropped instead of failing the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedInterval {
    pub owner_id: String,
    /// Position of the record in the submitted list.
    pub index: usize,
    pub reason: String,
}

/// One `{start, end}` record as submitted by a participant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusySlotInput {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

/// Result of parsing one participant's busy list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedBusySlots {
    pub intervals: Vec<BusyInterval>,
    pub skipped: Vec<SkippedInterval>,
}

/// Parse a JSON array of `{start, end}` records for `owner_id`.
///
/// See [`parse_busy_inputs`] for the per-record rules.
pub fn parse_busy_slots(owner_id: &str, json: &str, zone: &str) -> Result<ParsedBusySlots> {
    let inputs: Vec<BusySlotInput> = serde_json::from_str(json)?;
    parse_busy_inputs(owner_id, &inputs, zone)
}

/// Turn submitted records into validated busy intervals.
///
/// - Records with a missing or empty `start`/`end` are ignored silently.
/// - Timestamps go through [`normalize`], so naive strings are read as UTC.
/// - Records with `end <= start` are skipped and reported in `skipped`.
///
/// # Errors
/// Returns `SlotError::InvalidZone` for an unknown zone (even for an empty
/// list) and `SlotError::InvalidTimestamp` for the first unparseable string.
pub fn parse_busy_inputs(
    owner_id: &str,
    inputs: &[BusySlotInput],
    zone: &str,
) -> Result<ParsedBusySlots> {
    parse_zone(zone)?;

    let mut parsed = ParsedBusySlots::default();
    for (index, input) in inputs.iter().enumerate() {
        let (Some(start), Some(end)) = (non_empty(&input.start), non_empty(&input.end)) else {
            continue;
        };
        let start = normalize(start, zone)?;
        let end = normalize(end, zone)?;

        match BusyInterval::new(owner_id, start, end) {
            Ok(interval) => parsed.intervals.push(interval),
            Err(e) => {
                tracing::warn!(owner = owner_id, index, error = %e, "skipping busy interval");
                parsed.skipped.push(SkippedInterval {
                    owner_id: owner_id.to_string(),
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(parsed)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Sort and merge overlapping or adjacent periods into a non-overlapping list.
fn merge_periods(
    mut periods: Vec<(DateTime<Utc>, DateTime<Utc>)>,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    periods.sort_by_key(|&(start, end)| (start, end));

    let mut merged: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::with_capacity(periods.len());
    for (start, end) in periods {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }
    merged
}

/// Read-only snapshot of every participant's busy time, keyed by owner id.
///
/// Owners may be registered with no busy time at all; they count as free
/// for every slot.
#[derive(Debug, Clone, Default)]
pub struct BusyIndex {
    owners: BTreeMap<String, Vec<(DateTime<Utc>, DateTime<Utc>)>>,
    skipped: Vec<SkippedInterval>,
}

impl BusyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an `owner -> intervals` mapping. Every key is registered,
    /// including owners whose interval list is empty.
    pub fn from_owners<I, K, V>(owners: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator<Item = BusyInterval>,
    {
        let mut index = Self::new();
        for (owner, intervals) in owners {
            index.register(owner);
            index.extend(intervals);
        }
        index
    }

    /// Make sure `owner_id` is known, without adding busy time.
    pub fn register(&mut self, owner_id: impl Into<String>) {
        self.owners.entry(owner_id.into()).or_default();
    }

    pub fn insert(&mut self, interval: BusyInterval) {
        self.extend(std::iter::once(interval));
    }

    /// Add intervals, re-merging each touched owner once.
    pub fn extend(&mut self, intervals: impl IntoIterator<Item = BusyInterval>) {
        let mut touched: Vec<String> = Vec::new();
        for interval in intervals {
            let periods = self.owners.entry(interval.owner_id.clone()).or_default();
            periods.push((interval.start, interval.end));
            if !touched.contains(&interval.owner_id) {
                touched.push(interval.owner_id);
            }
        }
        for owner in touched {
            if let Some(periods) = self.owners.get_mut(&owner) {
                *periods = merge_periods(std::mem::take(periods));
            }
        }
    }

    /// Add a participant's parsed busy list, registering the owner and
    /// keeping the skip report.
    pub fn add_parsed(&mut self, owner_id: &str, parsed: ParsedBusySlots) {
        self.register(owner_id);
        self.extend(parsed.intervals);
        self.skipped.extend(parsed.skipped);
    }

    /// Add a new participant's parsed busy list.
    ///
    /// # Errors
    /// Returns `SlotError::DuplicateParticipant` if `owner_id` is already
    /// registered; the index is left unchanged.
    pub fn add_participant(&mut self, owner_id: &str, parsed: ParsedBusySlots) -> Result<()> {
        if self.owners.contains_key(owner_id) {
            return Err(SlotError::DuplicateParticipant(owner_id.to_string()));
        }
        self.add_parsed(owner_id, parsed);
        Ok(())
    }

    /// Add a raw record, skipping (and reporting) it when `end <= start`.
    ///
    /// Returns whether the record was accepted.
    pub fn insert_raw(
        &mut self,
        owner_id: &str,
        index: usize,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> bool {
        self.register(owner_id);
        match BusyInterval::new(owner_id, start, end) {
            Ok(interval) => {
                self.insert(interval);
                true
            }
            Err(e) => {
                tracing::warn!(owner = owner_id, index, error = %e, "skipping busy interval");
                self.skipped.push(SkippedInterval {
                    owner_id: owner_id.to_string(),
                    index,
                    reason: e.to_string(),
                });
                false
            }
        }
    }

    /// Number of registered owners, with or without busy time.
    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    pub fn owners(&self) -> impl Iterator<Item = &str> {
        self.owners.keys().map(String::as_str)
    }

    /// Merged busy periods of `owner_id`, sorted by start.
    pub fn busy_periods(&self, owner_id: &str) -> &[(DateTime<Utc>, DateTime<Utc>)] {
        self.owners.get(owner_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether any of `owner_id`'s busy time overlaps `[start, end)`.
    pub fn is_busy(&self, owner_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        let periods = self.busy_periods(owner_id);
        // Merged periods have strictly increasing ends.
        let first_ending_after = periods.partition_point(|&(_, p_end)| p_end <= start);
        periods
            .get(first_ending_after)
            .is_some_and(|&(p_start, p_end)| overlaps(p_start, p_end, start, end))
    }

    /// Number of distinct owners busy at some point during `[start, end)`.
    pub fn busy_owner_count(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> usize {
        self.owners()
            .filter(|owner| self.is_busy(owner, start, end))
            .count()
    }

    /// Records dropped for having `end <= start`.
    pub fn skipped(&self) -> &[SkippedInterval] {
        &self.skipped
    }
}

impl FromIterator<BusyInterval> for BusyIndex {
    fn from_iter<T: IntoIterator<Item = BusyInterval>>(iter: T) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}
