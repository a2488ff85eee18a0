//! Chat-completion collaborator.
//!
//! The orchestrator talks to [`ChatClient`], a one-method seam; the
//! production implementation posts to an OpenAI-style chat-completions
//! endpoint. Tests substitute scripted clients to control completion order
//! and inject failures.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::{
    config::ApiConfig,
    error::{LecsumError, Result},
};

/// One chat-completion call.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub model: &'static str,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Sends one request and resolves to the assistant message text.
    async fn complete(&self, request: ChatRequest) -> Result<String>;
}

/// Production client against an OpenAI-style chat-completions endpoint.
pub struct OpenAiChat {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl OpenAiChat {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            url: config.chat_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl ChatClient for OpenAiChat {
    async fn complete(&self, request: ChatRequest) -> Result<String> {
        debug!(model = request.model, "sending chat completion request");

        let response = self
            .http
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({
                "model": request.model,
                "messages": [
                    { "role": "system", "content": request.system },
                    { "role": "user", "content": request.user },
                ],
                "max_tokens": request.max_tokens,
                "temperature": request.temperature,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!(status = status.as_u16(), "chat completion rejected");
            return Err(LecsumError::RemoteRejected {
                status: status.as_u16(),
            });
        }

        let body = response.json::<serde_json::Value>().await?;
        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| LecsumError::InvalidResponse {
                reason: format!("missing message content in: {body}"),
            })?;

        Ok(content.to_string())
    }
}
