use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;

/// Sentinel action string the model is prompted to return for non-events.
pub const NO_SCHEDULE_ACTION: &str = "No scheduling info found.";

/// A schedule record with every default applied: ready for the calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSchedule {
    pub title: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub participants: Vec<String>,
}

/// Cache entry for an unread email classified as schedulable.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedEmail {
    pub email_id: String,
    pub subject: String,
    #[serde(rename = "from")]
    pub sender: String,
    pub snippet: String,
    pub scheduling_data: NormalizedSchedule,
    pub has_scheduling: bool,
}

/// Candidate event data submitted for explicit creation. All fields are
/// optional at the wire level; `into_schedule` enforces the completeness
/// gate.
#[derive(Debug, Clone, Default)]
pub struct EventSubmission {
    pub title: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub participants: Option<Value>,
}

impl EventSubmission {
    pub fn from_value(data: &Value) -> Self {
        Self {
            title: text_field(data, "title"),
            date: text_field(data, "date"),
            start_time: text_field(data, "start_time"),
            end_time: text_field(data, "end_time"),
            location: text_field(data, "location"),
            participants: data.get("participants").cloned(),
        }
    }

    /// Required fields for explicit creation. This gate is stricter than
    /// the reconciler's schedulability check, which needs only a date and a
    /// start time.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if field_empty(&self.title) {
            missing.push("title");
        }
        if field_empty(&self.date) {
            missing.push("date");
        }
        if field_empty(&self.start_time) {
            missing.push("start_time");
        }
        if field_empty(&self.end_time) {
            missing.push("end_time");
        }
        missing
    }

    pub fn into_schedule(self) -> Result<NormalizedSchedule, AppError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(AppError::Validation(missing.join(", ")));
        }

        Ok(NormalizedSchedule {
            title: self.title.unwrap_or_default(),
            date: self.date.unwrap_or_default(),
            start_time: self.start_time.unwrap_or_default(),
            end_time: self.end_time.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            participants: coerce_participants(self.participants.as_ref()),
        })
    }
}

/// String form of a field, whatever JSON type the model produced. Null and
/// absent both come back as None.
pub fn text_field(data: &Value, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Participants may arrive as a list, a bare string, or some other scalar;
/// non-list values become a single-element sequence of their string form.
pub fn coerce_participants(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        Some(other) => vec![other.to_string()],
    }
}

fn field_empty(field: &Option<String>) -> bool {
    field.as_deref().map(str::trim).unwrap_or("").is_empty()
}
