use super::LlmProvider;
use crate::errors::AppError;

const EXTRACTION_PROMPT: &str = r#"You are a helpful AI assistant that extracts meeting and scheduling information from email content.

Email:
"""{email_text}"""

If the email contains an event, extract:
- Title
- Date
- Start Time
- End Time
- Location (if any)
- Participants (if mentioned)
Return all dates in ISO format like "2025-10-23".

Respond ONLY in this JSON format:
{
  "title": "...",
  "date": "...",
  "start_time": "...",
  "end_time": "...",
  "location": "...",
  "participants": [...]
}

If there's no event, respond:
{ "action": "No scheduling info found." }
"#;

pub fn build_prompt(email_text: &str) -> String {
    EXTRACTION_PROMPT.replace("{email_text}", email_text)
}

/// Ask the model for scheduling fields and return the JSON span of its
/// reply as text. The span is not required to parse: callers that need an
/// object go through `reconcile::parse_record` and handle invalid JSON
/// there.
pub async fn extract_schedule_from_email(
    llm: &dyn LlmProvider,
    email_text: &str,
) -> Result<String, AppError> {
    let raw = llm.generate(&build_prompt(email_text)).await?;
    extract_json_block(&raw)
}

/// First `{` to last `}`. Greedy on purpose: one object per response,
/// surrounding prose discarded.
pub fn extract_json_block(raw: &str) -> Result<String, AppError> {
    let start = raw.find('{').ok_or(AppError::Extraction)?;
    let end = raw
        .rfind('}')
        .filter(|&end| end >= start)
        .ok_or(AppError::Extraction)?;
    let span = &raw[start..=end];
    Ok(strip_line_comments(span).trim().to_string())
}

/// Models occasionally annotate their JSON with `// ...` remarks; drop
/// everything from `//` to end of line.
fn strip_line_comments(span: &str) -> String {
    span.lines()
        .map(|line| match line.find("//") {
            Some(idx) => &line[..idx],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_object_from_prose() {
        let raw = "Sure! Here is the event:\n{\"title\": \"Sync\", \"date\": \"2025-10-23\"}\nLet me know if that helps.";
        let block = extract_json_block(raw).unwrap();
        assert_eq!(block, "{\"title\": \"Sync\", \"date\": \"2025-10-23\"}");
    }

    #[test]
    fn test_strips_line_comments() {
        let raw = "{\n  \"date\": \"2025-10-23\", // the date mentioned\n  \"start_time\": \"09:00\"\n}";
        let block = extract_json_block(raw).unwrap();
        assert!(!block.contains("//"));
        let parsed: serde_json::Value = serde_json::from_str(&block).unwrap();
        assert_eq!(parsed["start_time"], "09:00");
    }

    #[test]
    fn test_no_braces_is_an_extraction_error() {
        let err = extract_json_block("I could not find any event here.").unwrap_err();
        assert!(matches!(err, AppError::Extraction));
        let err = extract_json_block("unbalanced { only").unwrap_err();
        assert!(matches!(err, AppError::Extraction));
    }

    #[test]
    fn test_invalid_json_span_still_returned() {
        // Best-effort: the span comes back even when it will not parse.
        let block = extract_json_block("{this is not valid json}").unwrap();
        assert_eq!(block, "{this is not valid json}");
    }

    #[test]
    fn test_greedy_span_covers_multiple_objects() {
        let block = extract_json_block("{\"a\": 1} and {\"b\": 2}").unwrap();
        assert_eq!(block, "{\"a\": 1} and {\"b\": 2}");
    }

    #[test]
    fn test_prompt_embeds_email_text() {
        let prompt = build_prompt("Lunch on Friday at noon");
        assert!(prompt.contains("Lunch on Friday at noon"));
        assert!(prompt.contains("No scheduling info found."));
    }
}
