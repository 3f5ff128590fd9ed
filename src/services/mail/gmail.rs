use async_trait::async_trait;
use serde_json::Value;

use super::MailProvider;
use crate::errors::AppError;
use crate::models::EmailMessage;

const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1";

pub struct GmailProvider {
    access_token: String,
    client: reqwest::Client,
}

impl GmailProvider {
    pub fn new(access_token: String) -> Self {
        Self {
            access_token,
            client: reqwest::Client::new(),
        }
    }

    async fn fetch_message(&self, id: &str) -> Result<EmailMessage, AppError> {
        let url = format!(
            "{GMAIL_API_BASE}/users/me/messages/{id}?format=metadata&metadataHeaders=Subject&metadataHeaders=From"
        );
        let data = self.get_json(&url).await?;

        Ok(EmailMessage {
            id: id.to_string(),
            subject: header_value(&data, "Subject"),
            sender: header_value(&data, "From"),
            snippet: data["snippet"].as_str().unwrap_or("").to_string(),
        })
    }

    async fn get_json(&self, url: &str) -> Result<Value, AppError> {
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("failed to call Gmail API: {e}")))?;

        let status = resp.status();
        let data: Value = resp
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("failed to parse Gmail response: {e}")))?;

        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "Gmail API error ({status}): {data}"
            )));
        }
        Ok(data)
    }
}

fn header_value(message: &Value, name: &str) -> String {
    message["payload"]["headers"]
        .as_array()
        .and_then(|headers| headers.iter().find(|h| h["name"].as_str() == Some(name)))
        .and_then(|h| h["value"].as_str())
        .unwrap_or("")
        .to_string()
}

#[async_trait]
impl MailProvider for GmailProvider {
    async fn list_unread(&self, max_results: usize) -> Result<Vec<EmailMessage>, AppError> {
        let url =
            format!("{GMAIL_API_BASE}/users/me/messages?q=is%3Aunread&maxResults={max_results}");
        let data = self.get_json(&url).await?;

        let ids: Vec<String> = data["messages"]
            .as_array()
            .map(|messages| {
                messages
                    .iter()
                    .filter_map(|m| m["id"].as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        // A single bad message must not lose the rest of the batch.
        let mut emails = Vec::with_capacity(ids.len());
        for id in ids {
            match self.fetch_message(&id).await {
                Ok(email) => emails.push(email),
                Err(e) => {
                    tracing::warn!(message_id = %id, error = %e, "failed to fetch message metadata");
                }
            }
        }

        Ok(emails)
    }
}
