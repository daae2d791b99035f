//! WASM bindings for slot-engine.
//!
//! Exposes timestamp normalization, grid generation, heatmap projection, and
//! slot suggestions to JavaScript via `wasm-bindgen`. All complex types are
//! passed as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slot_engine::busy::{parse_busy_inputs, BusySlotInput};
use slot_engine::{
    aggregate_window, heatmap, timezone, BusyIndex, CandidateSlot, DstPolicy, MeetingWindow,
    SuggestionFilter,
};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SlotDto {
    start: String,
    end: String,
}

impl From<&CandidateSlot> for SlotDto {
    fn from(s: &CandidateSlot) -> Self {
        Self {
            start: rfc3339(s.start),
            end: rfc3339(s.end),
        }
    }
}

#[derive(Serialize)]
struct SuggestionDto {
    start: String,
    end: String,
    available_count: usize,
    total_participants: usize,
    percentage: f64,
    level: u8,
}

/// Input format for participants passed from JavaScript.
#[derive(Deserialize)]
struct ParticipantInput {
    id: String,
    #[serde(default)]
    time_zone: Option<String>,
    #[serde(default)]
    busy: Vec<BusySlotInput>,
}

fn rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

// ---------------------------------------------------------------------------
// JSON-in, JSON-out core (plain `String` errors so it runs off-wasm too)
// ---------------------------------------------------------------------------

fn parse_window(json: &str) -> Result<MeetingWindow, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid window JSON: {}", e))
}

fn parse_participants(json: &str, window: &MeetingWindow) -> Result<BusyIndex, String> {
    let inputs: Vec<ParticipantInput> =
        serde_json::from_str(json).map_err(|e| format!("Invalid participants JSON: {}", e))?;

    let mut index = BusyIndex::new();
    for p in inputs {
        let zone = p.time_zone.as_deref().unwrap_or(&window.time_zone);
        let parsed = parse_busy_inputs(&p.id, &p.busy, zone).map_err(|e| e.to_string())?;
        index.add_participant(&p.id, parsed).map_err(|e| e.to_string())?;
    }
    Ok(index)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn grid_json(window_json: &str) -> Result<String, String> {
    let window = parse_window(window_json)?;
    let grid = slot_engine::generate_grid(&window).map_err(|e| e.to_string())?;
    let dtos: Vec<SlotDto> = grid.iter().map(|s| SlotDto::from(&s)).collect();
    to_json(&dtos)
}

fn heatmap_json(
    window_json: &str,
    participants_json: &str,
    viewer_zone: &str,
) -> Result<String, String> {
    let window = parse_window(window_json)?;
    let index = parse_participants(participants_json, &window)?;
    let aggregated =
        aggregate_window(&window, &index, DstPolicy::default()).map_err(|e| e.to_string())?;
    let map = heatmap::project_window(&window, &aggregated, viewer_zone, DstPolicy::default())
        .map_err(|e| e.to_string())?;
    to_json(&map)
}

fn suggestions_json(
    window_json: &str,
    participants_json: &str,
    filter: SuggestionFilter,
) -> Result<String, String> {
    let window = parse_window(window_json)?;
    let index = parse_participants(participants_json, &window)?;
    let aggregated =
        aggregate_window(&window, &index, DstPolicy::default()).map_err(|e| e.to_string())?;

    let dtos: Vec<SuggestionDto> = slot_engine::top_suggestions(&aggregated, filter)
        .iter()
        .map(|s| SuggestionDto {
            start: rfc3339(s.slot.start),
            end: rfc3339(s.slot.end),
            available_count: s.available_count,
            total_participants: s.total_participants,
            percentage: s.percentage(),
            level: s.level(),
        })
        .collect();
    to_json(&dtos)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Normalize an ISO 8601 timestamp to an RFC 3339 UTC string.
///
/// Naive timestamps are read as UTC; `zone` must still be a valid IANA name.
#[wasm_bindgen(js_name = "normalizeTimestamp")]
pub fn normalize_timestamp(timestamp: &str, zone: &str) -> Result<String, JsValue> {
    timezone::normalize(timestamp, zone)
        .map(rfc3339)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Format an ISO 8601 instant as `YYYY-MM-DD HH:MM` in `zone`.
#[wasm_bindgen(js_name = "formatForZone")]
pub fn format_for_zone(instant: &str, zone: &str) -> Result<String, JsValue> {
    timezone::parse_timestamp(instant)
        .and_then(|dt| timezone::format_for_zone(dt, zone))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// List the candidate slots of a meeting window.
///
/// `window_json` is a `MeetingWindow` object. Returns a JSON array of
/// `{start, end}` RFC 3339 strings.
#[wasm_bindgen(js_name = "generateGrid")]
pub fn generate_grid(window_json: &str) -> Result<String, JsValue> {
    grid_json(window_json).map_err(|e| JsValue::from_str(&e))
}

/// Compute the availability heatmap for a viewer's zone.
///
/// `participants_json` is an array of `{id, time_zone?, busy: [{start, end}]}`.
/// Returns the heatmap as JSON (`dates`, `time_labels`, `cells`, `time_zone`).
#[wasm_bindgen(js_name = "computeHeatmap")]
pub fn compute_heatmap(
    window_json: &str,
    participants_json: &str,
    viewer_zone: &str,
) -> Result<String, JsValue> {
    heatmap_json(window_json, participants_json, viewer_zone).map_err(|e| JsValue::from_str(&e))
}

/// Best slots, most participants first, earliest first on ties.
///
/// `limit` defaults to 10 and `min_percentage` to 50.
#[wasm_bindgen(js_name = "suggestSlots")]
pub fn suggest_slots(
    window_json: &str,
    participants_json: &str,
    limit: Option<u32>,
    min_percentage: Option<f64>,
) -> Result<String, JsValue> {
    let defaults = SuggestionFilter::default();
    let filter = SuggestionFilter {
        limit: limit.map(|l| l as usize).unwrap_or(defaults.limit),
        min_percentage: min_percentage.unwrap_or(defaults.min_percentage),
    };
    suggestions_json(window_json, participants_json, filter).map_err(|e| JsValue::from_str(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const WINDOW: &str = r#"{
        "time_zone": "UTC",
        "date_range_start": "2024-01-01",
        "date_range_end": "2024-01-01",
        "work_hours_start": "09:00:00",
        "work_hours_end": "11:00:00",
        "step_minutes": 60,
        "duration_minutes": 60,
        "work_days_only": true
    }"#;

    const PARTICIPANTS: &str = r#"[
        {"id": "alice", "busy": [{"start": "2024-01-01T09:00:00Z", "end": "2024-01-01T10:00:00Z"}]},
        {"id": "bob"}
    ]"#;

    #[test]
    fn grid_json_lists_slots() {
        let slots: Value = serde_json::from_str(&grid_json(WINDOW).unwrap()).unwrap();
        assert_eq!(slots.as_array().unwrap().len(), 2);
        assert_eq!(slots[0]["start"], "2024-01-01T09:00:00+00:00");
    }

    #[test]
    fn heatmap_json_counts_participants() {
        let map: Value =
            serde_json::from_str(&heatmap_json(WINDOW, PARTICIPANTS, "UTC").unwrap()).unwrap();
        assert_eq!(map["cells"]["2024-01-01"]["09:00"]["available_count"], 1);
        assert_eq!(map["cells"]["2024-01-01"]["10:00"]["available_count"], 2);
    }

    #[test]
    fn heatmap_json_without_participants_is_zero_filled() {
        let map: Value = serde_json::from_str(&heatmap_json(WINDOW, "[]", "UTC").unwrap()).unwrap();
        assert_eq!(map["time_labels"], serde_json::json!(["09:00", "10:00"]));
        assert_eq!(map["cells"]["2024-01-01"]["09:00"]["level"], 0);
    }

    #[test]
    fn suggestions_json_ranks_unanimous_first() {
        let out = suggestions_json(WINDOW, PARTICIPANTS, SuggestionFilter::default()).unwrap();
        let list: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(list[0]["start"], "2024-01-01T10:00:00+00:00");
        assert_eq!(list[0]["level"], 5);
        assert_eq!(list[1]["percentage"], 50.0);
    }

    #[test]
    fn duplicate_participant_is_rejected() {
        let participants = r#"[{"id": "alice"}, {"id": "alice"}]"#;
        let err = heatmap_json(WINDOW, participants, "UTC").unwrap_err();
        assert_eq!(err, "Duplicate participant: alice");
    }

    #[test]
    fn bad_window_json_is_reported() {
        assert!(grid_json("{}").unwrap_err().starts_with("Invalid window JSON"));
    }
}
