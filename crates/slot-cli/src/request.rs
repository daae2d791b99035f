//! The JSON meeting request the CLI reads: a window plus each participant's
//! submitted busy slots.

use serde::{Deserialize, Serialize};
use slot_engine::busy::{parse_busy_inputs, BusySlotInput};
use slot_engine::{BusyIndex, MeetingWindow, SlotError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingRequest {
    pub window: MeetingWindow,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    /// Zone the participant submitted in; the window's zone when absent.
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub busy: Vec<BusySlotInput>,
}

impl MeetingRequest {
    /// Parse every participant's busy list into one index. Every participant
    /// is registered, so the index's owner count is the participant count.
    /// Participant ids must be unique.
    pub fn busy_index(&self) -> Result<BusyIndex, SlotError> {
        let mut index = BusyIndex::new();
        for participant in &self.participants {
            let zone = participant
                .time_zone
                .as_deref()
                .unwrap_or(&self.window.time_zone);
            let parsed = parse_busy_inputs(&participant.id, &participant.busy, zone)?;
            index.add_participant(&participant.id, parsed)?;
        }

        for skipped in index.skipped() {
            tracing::warn!(
                participant = %skipped.owner_id,
                record = skipped.index,
                reason = %skipped.reason,
                "dropped busy record"
            );
        }
        Ok(index)
    }
}
