use std::fmt;
use std::path::PathBuf;

use crate::types::{ModelFamily, TechStack};

/// Supabase project credentials collected for the Next.js + Supabase stack
#[derive(Clone, PartialEq, Eq)]
pub struct SupabaseCredentials {
    pub url: String,
    pub anon_key: String,
    pub access_token: String,
}

impl fmt::Debug for SupabaseCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseCredentials")
            .field("url", &self.url)
            .field("anon_key", &"***")
            .field("access_token", &"***")
            .finish()
    }
}

/// Fully resolved input for a build run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub name: String,
    pub description: String,
    pub tech_stack: TechStack,
    pub model: String,
    pub supabase: Option<SupabaseCredentials>,
}

impl BuildRequest {
    pub fn new(name: impl Into<String>, description: impl Into<String>, tech_stack: TechStack, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            tech_stack,
            model: model.into(),
            supabase: None,
        }
    }

    pub fn with_supabase(mut self, credentials: SupabaseCredentials) -> Self {
        self.supabase = Some(credentials);
        self
    }

    pub fn model_family(&self) -> Option<ModelFamily> {
        ModelFamily::from_model_id(&self.model)
    }
}

/// Default project directory for a project name: lowercase, spaces become hyphens
pub fn slugify_project_name(name: &str) -> PathBuf {
    PathBuf::from(name.to_lowercase().replace(' ', "-"))
}
