use std::collections::HashMap;

use crate::models::{ClassifiedEmail, EmailMessage};
use crate::services::ai::{extract, LlmProvider};
use crate::services::reconcile::{self, Reconciled};

pub struct ScanOutcome {
    /// Schedulable records keyed by message id, last write wins.
    pub schedulable: HashMap<String, ClassifiedEmail>,
    /// How many of the scanned emails were schedulable. Counted per email,
    /// so duplicate ids can push this above the map size.
    pub schedulable_count: usize,
}

/// Run extractor and reconciler over a batch of unread mail. A malformed
/// item never aborts the batch: it is logged and skipped.
pub async fn classify_emails(llm: &dyn LlmProvider, emails: &[EmailMessage]) -> ScanOutcome {
    let mut schedulable = HashMap::new();
    let mut schedulable_count = 0;

    for email in emails {
        tracing::debug!(email_id = %email.id, subject = %email.subject, "analyzing email");

        let raw = match extract::extract_schedule_from_email(llm, &email.snippet).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(email_id = %email.id, error = %e, "skipping email: extraction failed");
                continue;
            }
        };

        let parsed = match reconcile::parse_record(&raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(email_id = %email.id, error = %e, "skipping email: unparseable model output");
                continue;
            }
        };

        match reconcile::reconcile(&parsed) {
            Reconciled::Event(schedule) => {
                schedulable_count += 1;
                schedulable.insert(
                    email.id.clone(),
                    ClassifiedEmail {
                        email_id: email.id.clone(),
                        subject: email.subject.clone(),
                        sender: email.sender.clone(),
                        snippet: email.snippet.clone(),
                        scheduling_data: schedule,
                        has_scheduling: true,
                    },
                );
            }
            Reconciled::NoEvent(_) => {
                tracing::debug!(email_id = %email.id, "no scheduling info in email");
            }
        }
    }

    ScanOutcome {
        schedulable,
        schedulable_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::errors::AppError;

    /// Replies keyed on a marker word in the prompt (which embeds the
    /// email snippet).
    struct ScriptedLlm;

    #[async_trait]
    impl LlmProvider for ScriptedLlm {
        async fn generate(&self, prompt: &str) -> Result<String, AppError> {
            if prompt.contains("standup") {
                Ok(r#"Here you go:
{"title": "Standup", "date": "2025-10-23", "start_time": "09:00", "end_time": "09:15", "location": "", "participants": []}"#
                    .to_string())
            } else if prompt.contains("garbled") {
                Ok("{not json at all".to_string())
            } else if prompt.contains("offline") {
                Err(AppError::Upstream("model unavailable".to_string()))
            } else {
                Ok(r#"{ "action": "No scheduling info found." }"#.to_string())
            }
        }
    }

    fn email(id: &str, snippet: &str) -> EmailMessage {
        EmailMessage {
            id: id.to_string(),
            subject: format!("subject {id}"),
            sender: "someone@example.com".to_string(),
            snippet: snippet.to_string(),
        }
    }

    #[tokio::test]
    async fn test_partitions_batch() {
        let emails = vec![
            email("m1", "standup tomorrow"),
            email("m2", "monthly newsletter"),
            email("m3", "standup again"),
        ];
        let outcome = classify_emails(&ScriptedLlm, &emails).await;
        assert_eq!(outcome.schedulable_count, 2);
        assert_eq!(outcome.schedulable.len(), 2);
        assert!(outcome.schedulable.contains_key("m1"));
        assert!(outcome.schedulable.contains_key("m3"));
        assert_eq!(outcome.schedulable["m1"].scheduling_data.title, "Standup");
        assert!(outcome.schedulable["m1"].has_scheduling);
    }

    #[tokio::test]
    async fn test_bad_items_are_skipped_not_fatal() {
        let emails = vec![
            email("m1", "garbled reply incoming"),
            email("m2", "offline trigger"),
            email("m3", "standup at nine"),
        ];
        let outcome = classify_emails(&ScriptedLlm, &emails).await;
        assert_eq!(outcome.schedulable_count, 1);
        assert!(outcome.schedulable.contains_key("m3"));
    }

    #[tokio::test]
    async fn test_duplicate_ids_last_write_wins() {
        let emails = vec![email("m1", "standup early"), email("m1", "standup late")];
        let outcome = classify_emails(&ScriptedLlm, &emails).await;
        assert_eq!(outcome.schedulable_count, 2);
        assert_eq!(outcome.schedulable.len(), 1);
        assert_eq!(outcome.schedulable["m1"].snippet, "standup late");
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let outcome = classify_emails(&ScriptedLlm, &[]).await;
        assert_eq!(outcome.schedulable_count, 0);
        assert!(outcome.schedulable.is_empty());
    }
}
