use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::models::EventSubmission;
use crate::services::ai::extract;
use crate::services::{calendar, reconcile};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ScheduleEventRequest {
    pub scheduling_data: Option<Value>,
}

// POST /api/schedule-event
pub async fn schedule_event(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ScheduleEventRequest>,
) -> Result<Json<Value>, AppError> {
    let data = body
        .scheduling_data
        .ok_or_else(|| AppError::Validation("scheduling_data".to_string()))?;

    let schedule = EventSubmission::from_value(&data).into_schedule()?;
    let event = calendar::build_event(&schedule, state.timezone)?;
    state.calendar.insert_event(&event).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Event created successfully",
        "event_data": data,
    })))
}

#[derive(Deserialize)]
pub struct ProcessEmailRequest {
    pub email_text: String,
}

// POST /api/process-email — ad hoc extraction and creation for one raw
// body. Failures come back as structured responses, never silent skips.
pub async fn process_email(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ProcessEmailRequest>,
) -> Result<Json<Value>, AppError> {
    if body.email_text.trim().is_empty() {
        return Err(AppError::Validation("email_text".to_string()));
    }

    let raw = extract::extract_schedule_from_email(state.llm.as_ref(), &body.email_text).await?;

    let parsed = match reconcile::parse_record(&raw) {
        Ok(parsed) => parsed,
        Err(_) => {
            return Ok(Json(json!({
                "success": false,
                "message": "Failed to parse model output as JSON",
                "raw_output": raw,
            })));
        }
    };

    if parsed.get("action").is_some() {
        return Ok(Json(json!({
            "success": false,
            "message": "No scheduling information found in email",
            "raw_output": raw,
        })));
    }

    let submission = EventSubmission::from_value(&parsed);
    let missing = submission.missing_fields();
    if !missing.is_empty() {
        return Ok(Json(json!({
            "success": false,
            "message": format!("Missing required fields: {}", missing.join(", ")),
            "raw_output": raw,
        })));
    }

    let schedule = submission.into_schedule()?;
    let event = calendar::build_event(&schedule, state.timezone)?;
    state.calendar.insert_event(&event).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Event created successfully",
        "event_data": parsed,
    })))
}

#[derive(Deserialize)]
pub struct DebugQuery {
    pub text: Option<String>,
}

// GET /api/debug-scheduling — run the pipeline on a test string and report
// the classification signals.
pub async fn debug_scheduling(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DebugQuery>,
) -> Result<Json<Value>, AppError> {
    let text = query
        .text
        .unwrap_or_else(|| "Meeting tomorrow at 3pm in room A".to_string());

    let raw = extract::extract_schedule_from_email(state.llm.as_ref(), &text).await?;
    let parsed = reconcile::parse_record(&raw)?;

    let has_action_key = parsed.get("action").is_some();
    let has_date = reconcile::field_is_meaningful(&parsed, "date");
    let has_start_time = reconcile::field_is_meaningful(&parsed, "start_time");
    let would_be_detected = reconcile::reconcile(&parsed).is_event();

    Ok(Json(json!({
        "test_email": text,
        "structured_output": raw,
        "parsed_data": parsed,
        "has_action_key": has_action_key,
        "has_date": has_date,
        "has_start_time": has_start_time,
        "would_be_detected": would_be_detected,
        "cache_count": state.cache.len(),
    })))
}
