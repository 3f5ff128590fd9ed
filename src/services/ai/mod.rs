pub mod extract;
pub mod groq;
pub mod ollama;

use async_trait::async_trait;

use crate::errors::AppError;

#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AppError>;
}
