use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::Value;

use crate::client::{combined_system_prompt, send_json, ChatMessage, LlmClient};

/// Anthropic API version header value
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Output budget per request; scaffolding responses carry whole files
pub const ANTHROPIC_MAX_TOKENS: u32 = 16384;

/// Anthropic LLM client implementation using native Anthropic API
pub struct AnthropicLlmClient {
    api_key: String,
    model: String,
    base_url: String,
    agent_name: String,
    log_requests: bool,
    client: reqwest::Client,
}

impl AnthropicLlmClient {
    pub fn new(api_key: String, model: String, base_url: String, agent_name: String) -> Self {
        // Ensure base_url doesn't end with a slash
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            api_key,
            model,
            base_url,
            agent_name,
            log_requests: false,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_request_logging(mut self, enabled: bool) -> Self {
        self.log_requests = enabled;
        self
    }

    fn get_messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    fn convert_messages_to_anthropic_format(&self, messages: &[ChatMessage]) -> Vec<Value> {
        messages
            .iter()
            .filter(|msg| !msg.is_system())
            .map(|msg| {
                // Only user/assistant roles are accepted
                let role = if msg.role == "assistant" { "assistant" } else { "user" };
                serde_json::json!({
                    "role": role,
                    "content": msg.content
                })
            })
            .collect()
    }

    pub(crate) fn build_request(&self, messages: &[ChatMessage]) -> Value {
        let mut request = serde_json::json!({
            "model": self.model,
            "messages": self.convert_messages_to_anthropic_format(messages),
            "max_tokens": ANTHROPIC_MAX_TOKENS,
            "temperature": 0.2
        });

        if let Some(system_content) = combined_system_prompt(messages) {
            request["system"] = Value::String(system_content);
        }

        request
    }

    pub(crate) fn extract_text(response: &Value) -> Result<String> {
        let text: String = response["content"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter(|item| item["type"].as_str() == Some("text"))
                    .filter_map(|item| item["text"].as_str())
                    .collect()
            })
            .unwrap_or_default();

        if response["stop_reason"].as_str() == Some("max_tokens") {
            log::warn!("Anthropic response hit the max_tokens limit; output may be truncated");
        }

        if text.trim().is_empty() {
            bail!("Anthropic API returned no text content");
        }
        Ok(text)
    }
}

#[async_trait]
impl LlmClient for AnthropicLlmClient {
    async fn chat_completion(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = self.build_request(messages);
        let url = self.get_messages_url();
        log::debug!("[{}] sending {} messages to Anthropic", self.agent_name, messages.len());

        let builder = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION);

        let response = send_json("Anthropic", &url, builder, &request, &self.model, &self.api_key, self.log_requests).await?;
        Self::extract_text(&response)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
