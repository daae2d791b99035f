//! DST transition policies for candidate slot generation.

use serde::{Deserialize, Serialize};

/// Policy for local slot start times that do not exist in the window's zone
/// (the spring-forward gap, e.g. 02:30 in America/New_York on the second
/// Sunday of March).
///
/// Ambiguous fall-back times are not affected: they always resolve to the
/// earliest of the two instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DstPolicy {
    /// Drop slots whose local start falls in the DST gap.
    Skip,
    /// Read the local time with the offset in force before the transition,
    /// which lands it just past the gap (02:30 EST becomes 03:30 EDT).
    #[default]
    ShiftForward,
}
