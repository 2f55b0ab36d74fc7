//! Session-wide LLM access: API key discovery, interactive fallback and client construction.

use std::collections::HashMap;
use std::env;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{bail, Context, Result};

use crate::client::LlmClient;
use crate::config::{resolve_base_url_from_env, BackendType, ClientFactory};

/// Asks the user for a missing API key
pub trait KeyPrompter: Send + Sync {
    fn prompt_api_key(&self, backend: BackendType) -> Result<String>;
}

/// Holds the API keys for this session and hands out clients for them
pub struct LlmService {
    keys: Mutex<HashMap<BackendType, String>>,
    base_urls: HashMap<BackendType, String>,
    prompter: Arc<dyn KeyPrompter>,
    read_env: bool,
    log_requests: bool,
}

impl LlmService {
    /// Service that reads keys and base URLs from the process environment
    pub fn new(prompter: Arc<dyn KeyPrompter>) -> Self {
        Self {
            keys: Mutex::new(HashMap::new()),
            base_urls: HashMap::new(),
            prompter,
            read_env: true,
            log_requests: gocodeo_logging::request_logging_enabled(),
        }
    }

    /// Service that only knows keys set explicitly or entered at the prompt
    pub fn without_env(prompter: Arc<dyn KeyPrompter>) -> Self {
        Self {
            read_env: false,
            log_requests: false,
            ..Self::new(prompter)
        }
    }

    pub fn with_base_url(mut self, backend: BackendType, url: impl Into<String>) -> Self {
        self.base_urls.insert(backend, url.into());
        self
    }

    pub fn with_api_key(self, backend: BackendType, key: impl Into<String>) -> Self {
        self.set_api_key(backend, key);
        self
    }

    fn keys(&self) -> MutexGuard<'_, HashMap<BackendType, String>> {
        // The map stays consistent even if a holder panicked
        self.keys.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_api_key(&self, backend: BackendType, key: impl Into<String>) {
        self.keys().insert(backend, key.into());
    }

    pub fn has_api_key(&self, backend: BackendType) -> bool {
        self.lookup_key(backend).is_some()
    }

    fn lookup_key(&self, backend: BackendType) -> Option<String> {
        if let Some(key) = self.keys().get(&backend) {
            return Some(key.clone());
        }

        if !self.read_env {
            return None;
        }

        backend
            .api_key_env_vars()
            .iter()
            .filter_map(|var| env::var(var).ok())
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
    }

    /// Return the key for `backend`, asking the user once if none is configured
    pub fn ensure_backend(&self, backend: BackendType) -> Result<String> {
        if let Some(key) = self.lookup_key(backend) {
            log::debug!("{} API key found", backend.display_name());
            return Ok(key);
        }

        let entered = self
            .prompter
            .prompt_api_key(backend)
            .with_context(|| format!("Failed to read {} API key", backend.display_name()))?;
        let entered = entered.trim().to_string();

        if entered.is_empty() {
            bail!(
                "{} API key is required (set {})",
                backend.display_name(),
                backend.api_key_env_vars().join(" or ")
            );
        }

        self.set_api_key(backend, entered.clone());
        Ok(entered)
    }

    pub fn ensure_openai_client(&self) -> Result<()> {
        self.ensure_backend(BackendType::OpenAI).map(|_| ())
    }

    pub fn ensure_anthropic_client(&self) -> Result<()> {
        self.ensure_backend(BackendType::Anthropic).map(|_| ())
    }

    pub fn ensure_gemini_available(&self) -> Result<()> {
        self.ensure_backend(BackendType::Gemini).map(|_| ())
    }

    pub fn base_url(&self, backend: BackendType) -> String {
        if let Some(url) = self.base_urls.get(&backend) {
            return url.clone();
        }
        if self.read_env {
            resolve_base_url_from_env(&backend)
        } else {
            crate::config::get_default_url_for_backend(&backend)
        }
    }

    /// Build a client for `model`, ensuring its provider key first
    pub fn client_for_model(&self, model: &str, agent_name: &str) -> Result<Arc<dyn LlmClient>> {
        let Some(backend) = BackendType::from_model(model) else {
            bail!("Unsupported model '{}': expected a gpt*, claude* or gemini* model id", model);
        };
        let key = self.ensure_backend(backend)?;

        Ok(ClientFactory::create_with_logging(
            backend,
            key,
            model.to_string(),
            Some(self.base_url(backend)),
            Some(agent_name.to_string()),
            self.log_requests,
        ))
    }
}
