use serde::{Deserialize, Serialize};

/// An entry in the model selection menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelOption {
    pub code: &'static str,
    pub model_id: &'static str,
    pub display_name: &'static str,
    pub blurb: &'static str,
}

/// Available model options, keyed by menu number
pub const MODELS: [ModelOption; 3] = [
    ModelOption {
        code: "1",
        model_id: "claude-3-7-sonnet-20250219",
        display_name: "Claude 3.7 Sonnet (Anthropic)",
        blurb: "High quality code with excellent documentation",
    },
    ModelOption {
        code: "2",
        model_id: "gpt-4.1",
        display_name: "GPT-4.1 (OpenAI)",
        blurb: "Fast and reliable code generation",
    },
    ModelOption {
        code: "3",
        model_id: "gemini-2.5-pro-preview-03-25",
        display_name: "Gemini 2.5 Pro (Google)",
        blurb: "Advanced reasoning and error-free code",
    },
];

/// Claude 3.7 Sonnet is the default model
pub const DEFAULT_MODEL: &str = MODELS[0].model_id;

/// Resolve a menu choice to a model id, falling back to the default model
pub fn resolve_model_choice(choice: &str) -> &'static str {
    MODELS
        .iter()
        .find(|option| option.code == choice.trim())
        .map(|option| option.model_id)
        .unwrap_or(DEFAULT_MODEL)
}

/// Provider family of a model, detected from the model id prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelFamily {
    OpenAI,
    Anthropic,
    Gemini,
}

impl ModelFamily {
    pub fn from_model_id(model: &str) -> Option<Self> {
        if model.starts_with("gpt") {
            Some(Self::OpenAI)
        } else if model.starts_with("claude") {
            Some(Self::Anthropic)
        } else if model.starts_with("gemini") {
            Some(Self::Gemini)
        } else {
            None
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Gemini => "Google Gemini",
        }
    }
}

/// Preset frontend/backend combinations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechStack {
    NextSupabase,
    NextFirebase,
    NextMongoDb,
}

impl TechStack {
    pub const ALL: [TechStack; 3] = [
        TechStack::NextSupabase,
        TechStack::NextFirebase,
        TechStack::NextMongoDb,
    ];

    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Self::NextSupabase),
            "2" => Some(Self::NextFirebase),
            "3" => Some(Self::NextMongoDb),
            _ => None,
        }
    }

    pub fn choice(&self) -> &'static str {
        match self {
            Self::NextSupabase => "1",
            Self::NextFirebase => "2",
            Self::NextMongoDb => "3",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::NextSupabase => "Next.js + Supabase",
            Self::NextFirebase => "Next.js + Firebase",
            Self::NextMongoDb => "Next.js + MongoDB",
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Self::NextSupabase => "Modern full-stack app with serverless backend",
            Self::NextFirebase => "Scalable app with Firebase backend",
            Self::NextMongoDb => "Full-stack app with MongoDB database",
        }
    }

    pub fn features(&self) -> &'static str {
        match self {
            Self::NextSupabase => "Authentication, Real-time, PostgreSQL, TypeScript",
            Self::NextFirebase => "Authentication, Firestore, Real-time, TypeScript",
            Self::NextMongoDb => "MongoDB, REST API, TypeScript, Authentication",
        }
    }

    /// Only the Supabase stack needs backend credentials up front
    pub fn requires_supabase_credentials(&self) -> bool {
        matches!(self, Self::NextSupabase)
    }

    /// Stacks shown in the interactive menu. Firebase and MongoDB stay reachable through --tech-stack.
    pub fn menu() -> &'static [TechStack] {
        &Self::ALL[..1]
    }
}

/// Display name for a raw tech stack choice
pub fn tech_stack_name(choice: &str) -> &'static str {
    TechStack::from_choice(choice)
        .map(|stack| stack.display_name())
        .unwrap_or("Unknown")
}
