// Models module - build request and registry types shared across crates
pub mod types;
pub mod request;


// Re-export commonly used types
pub use types::{
    ModelFamily, TechStack, ModelOption,
    MODELS, DEFAULT_MODEL,
    resolve_model_choice, tech_stack_name,
};
pub use request::{BuildRequest, SupabaseCredentials, slugify_project_name};
