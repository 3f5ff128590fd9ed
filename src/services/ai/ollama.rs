use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::LlmProvider;
use crate::errors::AppError;

pub struct OllamaProvider {
    url: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(url: String, model: String, timeout: Duration) -> Self {
        Self {
            url,
            model,
            timeout,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        });

        let resp = self
            .client
            .post(format!("{}/api/generate", self.url))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("failed to call Ollama API: {e}")))?;

        let status = resp.status();
        let data: Value = resp
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("failed to parse Ollama response: {e}")))?;

        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "Ollama API error ({status}): {data}"
            )));
        }
        if let Some(err) = data.get("error").and_then(Value::as_str) {
            return Err(AppError::Upstream(format!("Ollama returned an error: {err}")));
        }

        data["response"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::Upstream("missing response field in Ollama reply".to_string()))
    }
}
