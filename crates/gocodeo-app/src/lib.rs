//! gocodeo command line application
//!
//! Collects a build request interactively and hands it to the build agent.

pub mod cli;
pub mod commands;
pub mod config;
pub mod prompt;

pub use cli::{Cli, Commands, InitArgs};
pub use commands::{AgentFactory, InitCommand, InitError, LlmAgentFactory};
pub use config::load_workspace_env;
pub use prompt::{Prompter, TerminalKeyPrompter, TerminalPrompter};
