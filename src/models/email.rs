use serde::{Deserialize, Serialize};

/// Read-only descriptor of one unread message from the mail provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub id: String,
    pub subject: String,
    #[serde(rename = "from")]
    pub sender: String,
    pub snippet: String,
}
