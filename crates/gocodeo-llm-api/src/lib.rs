//! # gocodeo-llm-api
//!
//! A unified interface for the LLM providers gocodeo can build with:
//! - Anthropic (Claude)
//! - OpenAI (GPT)
//! - Google Gemini
//!
//! ## Features
//!
//! - **Unified Interface**: Single `LlmClient` trait for all providers
//! - **Format Translation**: Chat messages are translated into each provider's wire format
//! - **Key Management**: `LlmService` finds API keys in the environment and asks for
//!   missing ones once per session
//!
//! ## Example
//!
//! ```rust,no_run
//! use gocodeo_llm_api::{ClientFactory, BackendType, ChatMessage, LlmClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ClientFactory::create(
//!         BackendType::Anthropic,
//!         "your-api-key".to_string(),
//!         "claude-3-7-sonnet-20250219".to_string(),
//!         None,
//!         Some("my-agent".to_string()),
//!     );
//!
//!     let reply = client
//!         .chat_completion(&[ChatMessage::user("Hello!")])
//!         .await?;
//!     println!("Response: {}", reply);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod service;


// Re-export commonly used types
pub use client::{
    LlmClient,
    ChatMessage,
    anthropic::AnthropicLlmClient,
    gemini::GeminiLlmClient,
    openai::OpenAiLlmClient,
};

pub use config::{
    BackendType,
    ClientFactory,
    ANTHROPIC_API_URL,
    OPENAI_API_URL,
    GEMINI_API_URL,
    normalize_api_url,
    get_default_url_for_backend,
};

pub use service::{KeyPrompter, LlmService};
