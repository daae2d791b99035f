//! Slot ranking -- order aggregated slots for suggestion or auto-selection.
//!
//! Ranking only orders; committing to a slot is the caller's decision.

use crate::aggregate::SlotAvailability;
use serde::{Deserialize, Serialize};

/// Shortlist constraints for [`top_suggestions`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionFilter {
    /// Maximum number of slots returned.
    pub limit: usize,
    /// Minimum availability percentage (inclusive).
    pub min_percentage: f64,
}

impl Default for SuggestionFilter {
    fn default() -> Self {
        Self {
            limit: 10,
            min_percentage: 50.0,
        }
    }
}

/// Sort by available count descending, then by start ascending.
pub fn rank<I>(aggregated: I) -> Vec<SlotAvailability>
where
    I: IntoIterator<Item = SlotAvailability>,
{
    let mut ranked: Vec<SlotAvailability> = aggregated.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.available_count
            .cmp(&a.available_count)
            .then_with(|| a.slot.start.cmp(&b.slot.start))
    });
    ranked
}

/// Ranked slots meeting `filter.min_percentage`, at most `filter.limit` of them.
pub fn top_suggestions(
    aggregated: &[SlotAvailability],
    filter: SuggestionFilter,
) -> Vec<SlotAvailability> {
    rank(aggregated.iter().cloned())
        .into_iter()
        .filter(|s| s.percentage() >= filter.min_percentage)
        .take(filter.limit)
        .collect()
}
