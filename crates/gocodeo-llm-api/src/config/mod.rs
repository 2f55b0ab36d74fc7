use std::env;

use gocodeo_models::ModelFamily;

pub mod factory;
pub use factory::ClientFactory;

/// Backend type for LLM models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendType {
    Anthropic,
    OpenAI,
    Gemini,
}

impl BackendType {
    /// Detect the backend serving a model id (`gpt*`, `claude*`, `gemini*`)
    pub fn from_model(model: &str) -> Option<Self> {
        ModelFamily::from_model_id(model).map(Self::from)
    }

    pub fn display_name(&self) -> &str {
        match self {
            Self::Anthropic => "Anthropic",
            Self::OpenAI => "OpenAI",
            Self::Gemini => "Google Gemini",
        }
    }

    /// Environment variables holding the API key, in lookup order
    pub fn api_key_env_vars(&self) -> &'static [&'static str] {
        match self {
            Self::Anthropic => &["ANTHROPIC_API_KEY", "ANTHROPIC_AUTH_TOKEN"],
            Self::OpenAI => &["OPENAI_API_KEY"],
            Self::Gemini => &["GEMINI_API_KEY", "GOOGLE_API_KEY"],
        }
    }

    /// Environment variable overriding the API base URL
    pub fn base_url_env_var(&self) -> &'static str {
        match self {
            Self::Anthropic => "ANTHROPIC_BASE_URL",
            Self::OpenAI => "OPENAI_BASE_URL",
            Self::Gemini => "GEMINI_BASE_URL",
        }
    }
}

impl From<ModelFamily> for BackendType {
    fn from(family: ModelFamily) -> Self {
        match family {
            ModelFamily::Anthropic => Self::Anthropic,
            ModelFamily::OpenAI => Self::OpenAI,
            ModelFamily::Gemini => Self::Gemini,
        }
    }
}

/// Default Anthropic API URL
pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com";

/// Default OpenAI API URL
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default Gemini API URL
pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Get the default URL for a given backend type
pub fn get_default_url_for_backend(backend: &BackendType) -> String {
    match backend {
        BackendType::Anthropic => ANTHROPIC_API_URL.to_string(),
        BackendType::OpenAI => OPENAI_API_URL.to_string(),
        BackendType::Gemini => GEMINI_API_URL.to_string(),
    }
}

/// Base URL for a backend: `<BACKEND>_BASE_URL` from the environment, else the default
pub fn resolve_base_url_from_env(backend: &BackendType) -> String {
    env::var(backend.base_url_env_var())
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| get_default_url_for_backend(backend))
}

/// Normalize API URL by ensuring it has the correct path for OpenAI-compatible endpoints
pub fn normalize_api_url(url: &str) -> String {
    // If URL already contains a path with "completions", use it as-is
    if url.contains("/completions") {
        return url.to_string();
    }

    let url = url.trim_end_matches('/');
    if url.ends_with("/v1") {
        format!("{}/chat/completions", url)
    } else {
        // Append the standard OpenAI-compatible path
        format!("{}/v1/chat/completions", url)
    }
}
