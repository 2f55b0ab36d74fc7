pub mod init;

pub use init::{
    run_build, resolve_directory, validate_api_key_for_model, AgentFactory, InitCommand, InitError, LlmAgentFactory,
};
