//! Completion client for the AI recommendation path. Speaks the
//! OpenAI-compatible chat completions wire format.

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Completion service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed completion response: {0}")]
    Malformed(String),
}

pub struct CompletionClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl CompletionClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            http,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f64,
    ) -> Result<String, CompletionError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "max_tokens": max_tokens,
            "temperature": temperature,
        });

        debug!("Requesting completion ({} prompt bytes)", prompt.len());
        let response = self
            .http
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = response.json().await?;
        value["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| CompletionError::Malformed("no message content".to_string()))
    }
}
