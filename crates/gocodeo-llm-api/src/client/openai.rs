use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;

use crate::client::{send_json, ChatMessage, LlmClient};
use crate::config::normalize_api_url;

/// OpenAI chat completions client
pub struct OpenAiLlmClient {
    api_key: String,
    model: String,
    api_url: String,
    agent_name: String,
    log_requests: bool,
    client: reqwest::Client,
}

impl OpenAiLlmClient {
    pub fn new(api_key: String, model: String, api_url: String, agent_name: String) -> Self {
        Self {
            api_key,
            model,
            api_url: normalize_api_url(&api_url),
            agent_name,
            log_requests: false,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_request_logging(mut self, enabled: bool) -> Self {
        self.log_requests = enabled;
        self
    }

    pub(crate) fn build_request(&self, messages: &[ChatMessage]) -> Value {
        serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": 0.2
        })
    }

    pub(crate) fn extract_text(response: &Value) -> Result<String> {
        response["choices"][0]["message"]["content"]
            .as_str()
            .filter(|content| !content.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| anyhow!("No content in OpenAI response"))
    }
}

#[async_trait]
impl LlmClient for OpenAiLlmClient {
    async fn chat_completion(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = self.build_request(messages);
        log::debug!("[{}] sending {} messages to OpenAI", self.agent_name, messages.len());

        let builder = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key));

        let response = send_json("OpenAI", &self.api_url, builder, &request, &self.model, &self.api_key, self.log_requests).await?;
        Self::extract_text(&response)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
