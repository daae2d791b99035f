//! # slot-engine
//!
//! Timezone-aware availability aggregation for group meeting scheduling.
//!
//! Given a leader's meeting window (dates, work hours, step, duration, zone)
//! and every participant's busy intervals, the engine lays a grid of
//! candidate slots over the window, counts how many participants are free
//! for each slot, and presents the result either as a heatmap in any
//! viewer's zone or as a ranked shortlist. Everything is a pure function of
//! its inputs: no I/O, no shared state.
//!
//! ## Modules
//!
//! - [`timezone`] — timestamp strings and local wall-clock values → UTC
//! - [`dst`] — DST gap policies for slot generation
//! - [`window`] — the `MeetingWindow` search space
//! - [`grid`] — meeting window → lazy, ordered grid of candidate slots
//! - [`busy`] — busy-interval intake and the per-owner busy index
//! - [`aggregate`] — per-slot free-participant counts
//! - [`heatmap`] — viewer-zone projection with percentage and intensity level
//! - [`ranker`] — best-first ordering and shortlists
//! - [`error`] — Error types

pub mod aggregate;
pub mod busy;
pub mod dst;
pub mod error;
pub mod grid;
pub mod heatmap;
pub mod ranker;
pub mod timezone;
pub mod window;

pub use aggregate::{aggregate, aggregate_slot, aggregate_window, SlotAvailability};
pub use busy::{parse_busy_slots, BusyIndex, BusyInterval, SkippedInterval};
pub use dst::DstPolicy;
pub use error::SlotError;
pub use grid::{generate_grid, CandidateSlot, Grid};
pub use heatmap::{project, project_window, Heatmap, HeatmapCell};
pub use ranker::{rank, top_suggestions, SuggestionFilter};
pub use timezone::normalize;
pub use window::MeetingWindow;
