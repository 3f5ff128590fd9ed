use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::services::{calendar, scan};
use crate::state::AppState;

/// The classify pass always looks at the same number of unread mails.
const FETCH_BATCH_SIZE: usize = 10;
const DEFAULT_LIST_SIZE: usize = 5;

#[derive(Deserialize)]
pub struct ListQuery {
    pub max_results: Option<usize>,
}

// GET /api/emails
pub async fn get_emails(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, AppError> {
    let max_results = query.max_results.unwrap_or(DEFAULT_LIST_SIZE);
    let emails = state.mail.list_unread(max_results).await?;
    Ok(Json(json!({ "emails": emails })))
}

// GET /api/fetch-emails
pub async fn fetch_emails(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let emails = state.mail.list_unread(FETCH_BATCH_SIZE).await?;
    let outcome = scan::classify_emails(state.llm.as_ref(), &emails).await;

    let found = outcome.schedulable_count;
    state.cache.replace_all(outcome.schedulable);

    let count = emails.len();
    Ok(Json(json!({
        "success": true,
        "count": count,
        "emails": emails,
        "scheduling_found": found,
        "message": format!("Fetched {count} emails. Found {found} emails with scheduling content."),
    })))
}

// GET /api/scheduling-emails
pub async fn scheduling_emails(State(state): State<Arc<AppState>>) -> Json<Value> {
    let entries = state.cache.snapshot();

    if entries.is_empty() {
        return Json(json!({
            "success": true,
            "scheduling_count": 0,
            "scheduling_emails": [],
            "message": "No emails with scheduling content found. Run a fetch pass first to analyze emails.",
        }));
    }

    Json(json!({
        "success": true,
        "scheduling_count": entries.len(),
        "scheduling_emails": entries,
        "message": format!("Found {} emails with scheduling information", entries.len()),
    }))
}

// POST /api/check-emails — classify a batch and create events right away,
// without touching the cache.
pub async fn check_emails(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, AppError> {
    let max_results = query.max_results.unwrap_or(DEFAULT_LIST_SIZE);
    let emails = state.mail.list_unread(max_results).await?;
    let outcome = scan::classify_emails(state.llm.as_ref(), &emails).await;

    let mut events_created = 0;
    for entry in outcome.schedulable.values() {
        let event = match calendar::build_event(&entry.scheduling_data, state.timezone) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(email_id = %entry.email_id, error = %e, "cannot build event from email");
                continue;
            }
        };
        match state.calendar.insert_event(&event).await {
            Ok(_) => events_created += 1,
            Err(e) => {
                tracing::warn!(email_id = %entry.email_id, error = %e, "failed to create event");
            }
        }
    }

    let count = emails.len();
    Ok(Json(json!({
        "processed_count": count,
        "events_created": events_created,
        "emails": emails,
        "message": format!("Checked {count} unread emails, created {events_created} events."),
    })))
}
