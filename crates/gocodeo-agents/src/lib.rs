//! Build agent for gocodeo
//!
//! This crate provides the `BuildFlow` contract the CLI drives and the
//! staged `BuildAgent` that generates a project with an LLM.

pub mod build_agent;
pub mod files;
pub mod flow;
pub mod prompts;
pub mod state;
pub mod task;

// Re-export commonly used types
pub use build_agent::*;
pub use files::{parse_generated_files, GeneratedFile};
pub use flow::*;
pub use state::{load_project_state, ProjectStage, ProjectState, TaskRecord};
pub use task::*;
