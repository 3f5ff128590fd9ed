use async_trait::async_trait;
use serde_json::Value;

use super::CalendarProvider;
use crate::errors::AppError;
use crate::models::CalendarEvent;

pub struct GoogleCalendarProvider {
    access_token: String,
    calendar_id: String,
    client: reqwest::Client,
}

impl GoogleCalendarProvider {
    pub fn new(access_token: String, calendar_id: String) -> Self {
        Self {
            access_token,
            calendar_id,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendarProvider {
    async fn insert_event(&self, event: &CalendarEvent) -> Result<String, AppError> {
        let url = format!(
            "https://www.googleapis.com/calendar/v3/calendars/{}/events",
            self.calendar_id
        );

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(event)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("failed to call Calendar API: {e}")))?;

        let status = resp.status();
        let data: Value = resp
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("failed to parse Calendar response: {e}")))?;

        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "Calendar API error ({status}): {data}"
            )));
        }

        let link = data["htmlLink"].as_str().unwrap_or("").to_string();
        tracing::info!(link = %link, summary = %event.summary, "calendar event created");
        Ok(link)
    }
}
