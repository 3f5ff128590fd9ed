use serde_json::{json, Value};

use crate::errors::AppError;
use crate::models::schedule::text_field;
use crate::models::{coerce_participants, NormalizedSchedule, NO_SCHEDULE_ACTION};
use crate::services::timeparse;

/// Outcome of reconciling one parsed model response.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciled {
    Event(NormalizedSchedule),
    /// Either the model's own action object, passed through unchanged, or
    /// the canonical sentinel when required fields were missing.
    NoEvent(Value),
}

impl Reconciled {
    pub fn is_event(&self) -> bool {
        matches!(self, Reconciled::Event(_))
    }
}

pub fn parse_record(raw: &str) -> Result<Value, AppError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| AppError::JsonParse(e.to_string()))?;
    if !value.is_object() {
        return Err(AppError::JsonParse("not a JSON object".to_string()));
    }
    Ok(value)
}

/// Apply alternate-key mapping and defaults, then classify. Partial records
/// (a date with no start time, and the reverse) are discarded, not
/// surfaced: the caller only ever sees a full event or the sentinel.
pub fn reconcile(parsed: &Value) -> Reconciled {
    if let Some(action) = text_field(parsed, "action") {
        if !action.trim().is_empty() {
            return Reconciled::NoEvent(parsed.clone());
        }
    }

    let mut record = parsed.clone();
    // Some models answer with `time` instead of `start_time`.
    if let Some(map) = record.as_object_mut() {
        if !map.contains_key("start_time") {
            if let Some(time) = map.get("time").cloned() {
                map.insert("start_time".to_string(), time);
            }
        }
    }

    let has_date = field_is_meaningful(&record, "date");
    let has_start = field_is_meaningful(&record, "start_time");
    if !(has_date && has_start) {
        tracing::debug!(has_date, has_start, "discarding record without a full date/start pair");
        return Reconciled::NoEvent(json!({ "action": NO_SCHEDULE_ACTION }));
    }

    let start_time = text_field(&record, "start_time").unwrap_or_default();
    let end_time = match text_field(&record, "end_time") {
        Some(end) if !end.trim().is_empty() => end,
        _ => timeparse::infer_end_time(&start_time),
    };
    let title = match text_field(&record, "title") {
        Some(title) if !title.trim().is_empty() => title,
        _ => "Meeting".to_string(),
    };

    Reconciled::Event(NormalizedSchedule {
        title,
        date: text_field(&record, "date").unwrap_or_default(),
        start_time,
        end_time,
        location: text_field(&record, "location").unwrap_or_default(),
        participants: coerce_participants(record.get("participants")),
    })
}

/// Present, and neither blank nor a literal "null"/"none".
pub fn field_is_meaningful(record: &Value, key: &str) -> bool {
    match text_field(record, key) {
        Some(text) => {
            let trimmed = text.trim();
            !trimmed.is_empty()
                && !trimmed.eq_ignore_ascii_case("null")
                && !trimmed.eq_ignore_ascii_case("none")
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ai::extract;

    #[test]
    fn test_action_object_passes_through_unchanged() {
        let parsed = json!({"action": "No scheduling info found.", "confidence": 0.9});
        match reconcile(&parsed) {
            Reconciled::NoEvent(value) => assert_eq!(value, parsed),
            Reconciled::Event(_) => panic!("action object must not be schedulable"),
        }
    }

    #[test]
    fn test_full_record_gets_defaults() {
        let parsed = json!({"date": "2025-10-23", "start_time": "09:00"});
        let Reconciled::Event(schedule) = reconcile(&parsed) else {
            panic!("expected a schedulable record");
        };
        assert_eq!(schedule.title, "Meeting");
        assert_eq!(schedule.location, "");
        assert!(schedule.participants.is_empty());
        assert_eq!(schedule.end_time, "09:30");
    }

    #[test]
    fn test_time_maps_to_start_time() {
        let parsed = json!({"date": "2025-10-23", "time": "09:00"});
        let Reconciled::Event(schedule) = reconcile(&parsed) else {
            panic!("expected a schedulable record");
        };
        assert_eq!(schedule.start_time, "09:00");
    }

    #[test]
    fn test_existing_start_time_wins_over_time() {
        let parsed = json!({"date": "2025-10-23", "start_time": "14:00", "time": "09:00"});
        let Reconciled::Event(schedule) = reconcile(&parsed) else {
            panic!("expected a schedulable record");
        };
        assert_eq!(schedule.start_time, "14:00");
    }

    #[test]
    fn test_null_and_none_strings_are_not_meaningful() {
        for start in ["null", "None", "NONE", "  ", ""] {
            let parsed = json!({"date": "2025-10-23", "start_time": start});
            let outcome = reconcile(&parsed);
            assert!(!outcome.is_event(), "start_time {start:?} must not classify");
        }
    }

    #[test]
    fn test_partial_record_becomes_canonical_sentinel() {
        let parsed = json!({"date": "2025-10-23", "location": "Room A"});
        match reconcile(&parsed) {
            Reconciled::NoEvent(value) => {
                assert_eq!(value, json!({"action": NO_SCHEDULE_ACTION}));
            }
            Reconciled::Event(_) => panic!("partial record must not classify"),
        }
    }

    #[test]
    fn test_unparseable_start_echoed_as_end_time() {
        let parsed = json!({"date": "2025-10-23", "start_time": "after lunch"});
        let Reconciled::Event(schedule) = reconcile(&parsed) else {
            panic!("expected a schedulable record");
        };
        assert_eq!(schedule.end_time, "after lunch");
    }

    #[test]
    fn test_scalar_participants_coerced() {
        let parsed = json!({
            "date": "2025-10-23",
            "start_time": "09:00",
            "participants": "alice@example.com",
        });
        let Reconciled::Event(schedule) = reconcile(&parsed) else {
            panic!("expected a schedulable record");
        };
        assert_eq!(schedule.participants, vec!["alice@example.com"]);
    }

    #[test]
    fn test_empty_action_does_not_block_classification() {
        let parsed = json!({"action": "", "date": "2025-10-23", "start_time": "09:00"});
        assert!(reconcile(&parsed).is_event());
    }

    #[test]
    fn test_parse_record_rejects_non_objects() {
        assert!(parse_record("[1, 2]").is_err());
        assert!(parse_record("not json at all").is_err());
    }

    #[test]
    fn test_reextraction_is_idempotent() {
        let parsed = parse_record(
            r#"{"date": "2025-10-23", "time": "3:00pm", "participants": "bob@example.com"}"#,
        )
        .unwrap();
        let Reconciled::Event(first) = reconcile(&parsed) else {
            panic!("expected a schedulable record");
        };

        let serialized = serde_json::to_string(&first).unwrap();
        let span = extract::extract_json_block(&serialized).unwrap();
        let reparsed = parse_record(&span).unwrap();
        let Reconciled::Event(second) = reconcile(&reparsed) else {
            panic!("re-extracted record must stay schedulable");
        };

        assert_eq!(first, second);
    }
}
