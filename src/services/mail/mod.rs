pub mod gmail;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::EmailMessage;

#[async_trait]
pub trait MailProvider: Send + Sync {
    async fn list_unread(&self, max_results: usize) -> Result<Vec<EmailMessage>, AppError>;
}
