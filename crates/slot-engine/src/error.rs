//! Error types for slot-engine operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlotError {
    #[error("Invalid timezone: {0}")]
    InvalidZone(String),

    #[error("Invalid timestamp '{input}': {reason}")]
    InvalidTimestamp { input: String, reason: String },

    /// A busy interval whose end does not come after its start.
    #[error("Invalid interval: end {end} is not after start {start}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid meeting window: {0}")]
    InvalidWindow(String),

    /// The busy index knows more owners than the declared participant count.
    #[error("Participant mismatch: {owners} busy owners but only {total} participants")]
    ParticipantMismatch { owners: usize, total: usize },

    #[error("Duplicate participant: {0}")]
    DuplicateParticipant(String),

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
}

impl From<serde_json::Error> for SlotError {
    fn from(e: serde_json::Error) -> Self {
        SlotError::InvalidJson(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SlotError>;
