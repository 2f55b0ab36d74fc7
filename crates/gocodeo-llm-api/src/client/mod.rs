use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use gocodeo_logging::{log_request_to_file, log_response_to_file, safe_truncate};

pub mod anthropic;
pub mod gemini;
pub mod openai;

/// Chat message structure (OpenAI-compatible roles: system, user, assistant)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }

    pub fn is_system(&self) -> bool {
        self.role == "system"
    }
}

/// LLM client trait - unified interface for all LLM providers
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Simple chat completion returning the assistant's text
    async fn chat_completion(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Model id this client sends requests for
    fn model(&self) -> &str;
}

/// Join all system messages into one block, the way Anthropic and Gemini expect it
pub(crate) fn combined_system_prompt(messages: &[ChatMessage]) -> Option<String> {
    let system_messages: Vec<&str> = messages
        .iter()
        .filter(|msg| msg.is_system())
        .map(|msg| msg.content.as_str())
        .collect();

    if system_messages.is_empty() {
        None
    } else {
        Some(system_messages.join("\n\n"))
    }
}

/// Shared POST path for every provider: optional file logging, status check, JSON decode
pub(crate) async fn send_json(
    provider: &str,
    url: &str,
    request: reqwest::RequestBuilder,
    body: &serde_json::Value,
    model: &str,
    api_key: &str,
    log_requests: bool,
) -> Result<serde_json::Value> {
    let request_timestamp = if log_requests {
        match log_request_to_file(url, body, model, api_key) {
            Ok(ts) => Some(ts),
            Err(e) => {
                log::warn!("could not write request log: {}", e);
                None
            }
        }
    } else {
        None
    };

    log::debug!("POST {} ({} model {})", url, provider, model);

    let response = request
        .header("Content-Type", "application/json")
        .json(body)
        .send()
        .await
        .with_context(|| format!("Failed to reach {} API at {}", provider, url))?;

    let status = response.status();
    let response_text = response
        .text()
        .await
        .with_context(|| format!("Failed to read {} API response", provider))?;

    if let Some(ts) = request_timestamp {
        if let Err(e) = log_response_to_file(status.as_u16(), &response_text, ts, model) {
            log::warn!("could not write response log: {}", e);
        }
    }

    if !status.is_success() {
        bail!(
            "{} API error ({}): {}",
            provider,
            status,
            safe_truncate(&response_text, 2000)
        );
    }

    serde_json::from_str(&response_text)
        .with_context(|| format!("{} API returned invalid JSON", provider))
}
