use std::sync::Arc;

use crate::client::{anthropic::AnthropicLlmClient, gemini::GeminiLlmClient, openai::OpenAiLlmClient, LlmClient};
use crate::config::{get_default_url_for_backend, BackendType};

/// Client factory for creating LLM clients
pub struct ClientFactory;

impl ClientFactory {
    /// Create an LLM client based on the specified backend type
    ///
    /// # Arguments
    /// * `backend` - The backend type to use (Anthropic, OpenAI, Gemini)
    /// * `api_key` - API key for authentication
    /// * `model` - Model name to use
    /// * `api_url` - Optional custom API URL (uses default if None)
    /// * `agent_name` - Optional agent name for logging purposes (defaults to "default")
    pub fn create(
        backend: BackendType,
        api_key: String,
        model: String,
        api_url: Option<String>,
        agent_name: Option<String>,
    ) -> Arc<dyn LlmClient> {
        Self::create_with_logging(backend, api_key, model, api_url, agent_name, false)
    }

    /// Same as [`ClientFactory::create`], optionally writing request/response logs
    pub fn create_with_logging(
        backend: BackendType,
        api_key: String,
        model: String,
        api_url: Option<String>,
        agent_name: Option<String>,
        log_requests: bool,
    ) -> Arc<dyn LlmClient> {
        let agent_name = agent_name.unwrap_or_else(|| "default".to_string());
        let url = api_url.unwrap_or_else(|| get_default_url_for_backend(&backend));
        log::info!("Using {} API for '{}' at: {}", backend.display_name(), agent_name, url);

        match backend {
            BackendType::Anthropic => Arc::new(
                AnthropicLlmClient::new(api_key, model, url, agent_name).with_request_logging(log_requests),
            ),
            BackendType::OpenAI => Arc::new(
                OpenAiLlmClient::new(api_key, model, url, agent_name).with_request_logging(log_requests),
            ),
            BackendType::Gemini => Arc::new(
                GeminiLlmClient::new(api_key, model, url, agent_name).with_request_logging(log_requests),
            ),
        }
    }
}
