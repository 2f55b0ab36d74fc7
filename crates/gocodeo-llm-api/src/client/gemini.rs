use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::Value;

use crate::client::{combined_system_prompt, send_json, ChatMessage, LlmClient};

/// Google Gemini client for the `generateContent` REST endpoint
pub struct GeminiLlmClient {
    api_key: String,
    model: String,
    base_url: String,
    agent_name: String,
    log_requests: bool,
    client: reqwest::Client,
}

impl GeminiLlmClient {
    pub fn new(api_key: String, model: String, base_url: String, agent_name: String) -> Self {
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

    fn get_generate_url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    pub(crate) fn build_request(&self, messages: &[ChatMessage]) -> Value {
        let contents: Vec<Value> = messages
            .iter()
            .filter(|msg| !msg.is_system())
            .map(|msg| {
                let role = if msg.role == "assistant" { "model" } else { "user" };
                serde_json::json!({
                    "role": role,
                    "parts": [{"text": msg.content}]
                })
            })
            .collect();

        let mut request = serde_json::json!({
            "contents": contents,
            "generationConfig": {"temperature": 0.2}
        });

        if let Some(system_content) = combined_system_prompt(messages) {
            request["systemInstruction"] = serde_json::json!({
                "parts": [{"text": system_content}]
            });
        }

        request
    }

    pub(crate) fn extract_text(response: &Value) -> Result<String> {
        if let Some(reason) = response["promptFeedback"]["blockReason"].as_str() {
            bail!("Gemini blocked the prompt: {}", reason);
        }

        let text: String = response["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| parts.iter().filter_map(|part| part["text"].as_str()).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            let finish = response["candidates"][0]["finishReason"].as_str().unwrap_or("unknown");
            bail!("Gemini API returned no text content (finish reason: {})", finish);
        }
        Ok(text)
    }
}

#[async_trait]
impl LlmClient for GeminiLlmClient {
    async fn chat_completion(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = self.build_request(messages);
        let url = self.get_generate_url();
        log::debug!("[{}] sending {} messages to Gemini", self.agent_name, messages.len());

        let builder = self.client.post(&url).header("x-goog-api-key", &self.api_key);

        let response = send_json("Gemini", &url, builder, &request, &self.model, &self.api_key, self.log_requests).await?;
        Self::extract_text(&response)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
