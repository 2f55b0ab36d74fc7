use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Result};
use colored::Colorize;
use thiserror::Error;

use gocodeo_agents::{BuildAgent, BuildFlow};
use gocodeo_llm_api::LlmService;
use gocodeo_models::{
    resolve_model_choice, slugify_project_name, BuildRequest, ModelFamily, SupabaseCredentials, TechStack, MODELS,
};

use crate::cli::InitArgs;
use crate::config::load_workspace_env;
use crate::prompt::Prompter;

/// Why `gocodeo init` stopped. Every variant exits with status 1.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Aborted!")]
    Aborted,

    #[error("Unknown tech stack '{0}' (expected 1, 2 or 3)")]
    UnknownTechStack(String),

    #[error("Error validating API key: {message}")]
    ApiKeyValidation { message: String },

    #[error("Failed to create directory {}: {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Build failed!")]
    BuildFailed,

    #[error("Error: {message}")]
    Build { message: String },
}

impl InitError {
    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// Creates the build flow for a project directory
pub trait AgentFactory {
    fn create(&self, project_dir: &Path) -> Box<dyn BuildFlow>;
}

/// Builds [`BuildAgent`]s backed by the session's [`LlmService`]
pub struct LlmAgentFactory {
    service: Arc<LlmService>,
}

impl LlmAgentFactory {
    pub fn new(service: Arc<LlmService>) -> Self {
        Self { service }
    }
}

impl AgentFactory for LlmAgentFactory {
    fn create(&self, project_dir: &Path) -> Box<dyn BuildFlow> {
        Box::new(BuildAgent::new(project_dir, Arc::clone(&self.service)))
    }
}

/// The `init` command: collect a build request interactively and hand it to the agent
pub struct InitCommand<'a> {
    prompter: &'a dyn Prompter,
    service: &'a LlmService,
    agents: &'a dyn AgentFactory,
}

impl<'a> InitCommand<'a> {
    pub fn new(prompter: &'a dyn Prompter, service: &'a LlmService, agents: &'a dyn AgentFactory) -> Self {
        Self {
            prompter,
            service,
            agents,
        }
    }

    pub fn run(&self, args: InitArgs) -> Result<(), InitError> {
        let name = match args.name {
            Some(name) => name,
            None => self.ask("What's your project name?", None)?,
        };
        let description = match args.description {
            Some(description) => description,
            None => self.ask("Describe your application", None)?,
        };

        let tech_stack = self.resolve_tech_stack(args.tech_stack.as_deref())?;
        let supabase = self.collect_supabase_credentials(tech_stack)?;
        let model = self.resolve_model(args.model.as_deref())?;

        validate_api_key_for_model(&model, self.service)
            .map_err(|e| InitError::ApiKeyValidation { message: format!("{:#}", e) })?;

        let project_dir = resolve_directory(args.directory, &name);
        self.prepare_directory(&project_dir)?;

        let mut request = BuildRequest::new(name, description, tech_stack, model);
        if let Some(credentials) = supabase {
            request = request.with_supabase(credentials);
        }

        let agent = self.agents.create(&project_dir);
        run_build(agent.as_ref(), &request)
    }

    fn ask(&self, message: &str, default: Option<&str>) -> Result<String, InitError> {
        self.prompter.prompt(message, default).map_err(|e| {
            log::debug!("Prompt '{}' failed: {:#}", message, e);
            InitError::Aborted
        })
    }

    fn ask_secret(&self, message: &str) -> Result<String, InitError> {
        self.prompter.prompt_secret(message).map_err(|e| {
            log::debug!("Prompt '{}' failed: {:#}", message, e);
            InitError::Aborted
        })
    }

    /// Use the flag value, or show the stack menu and ask
    pub fn resolve_tech_stack(&self, flag: Option<&str>) -> Result<TechStack, InitError> {
        let choice = match non_blank(flag) {
            Some(choice) => choice.to_string(),
            None => {
                print_tech_stack_menu();
                self.ask("Select your tech stack (enter number)", Some("1"))?
            }
        };

        TechStack::from_choice(&choice).ok_or(InitError::UnknownTechStack(choice))
    }

    /// Supabase credentials, asked for only when the stack needs them
    pub fn collect_supabase_credentials(
        &self,
        tech_stack: TechStack,
    ) -> Result<Option<SupabaseCredentials>, InitError> {
        if !tech_stack.requires_supabase_credentials() {
            return Ok(None);
        }

        println!();
        println!("{}", "For Supabase integration, please provide your credentials:".bold());
        let url = self.ask_secret("Supabase Project URL")?;
        let anon_key = self.ask_secret("Supabase Anon Key")?;
        let access_token = self.ask_secret("Supabase Access Token")?;

        Ok(Some(SupabaseCredentials {
            url,
            anon_key,
            access_token,
        }))
    }

    /// Use the flag value, or show the model menu and resolve the choice
    pub fn resolve_model(&self, flag: Option<&str>) -> Result<String, InitError> {
        if let Some(model) = non_blank(flag) {
            return Ok(model.to_string());
        }

        print_model_menu();
        let choice = self.ask("Select AI model to use (enter number) [1/2/3]", Some("1"))?;
        Ok(resolve_model_choice(&choice).to_string())
    }

    /// Refuse to reuse a non-empty directory unless the user agrees, then create it
    pub fn prepare_directory(&self, project_dir: &Path) -> Result<(), InitError> {
        let not_empty = match fs::read_dir(project_dir) {
            Ok(mut entries) => entries.next().is_some(),
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(source) => {
                return Err(InitError::Directory {
                    path: project_dir.to_path_buf(),
                    source,
                })
            }
        };

        if not_empty {
            println!(
                "{}",
                format!("Directory {} already exists and is not empty.", project_dir.display()).yellow()
            );
            let proceed = self
                .prompter
                .confirm("Do you want to continue anyway?", false)
                .unwrap_or(false);
            if !proceed {
                return Err(InitError::Aborted);
            }
        }

        fs::create_dir_all(project_dir).map_err(|source| InitError::Directory {
            path: project_dir.to_path_buf(),
            source,
        })
    }
}

/// Make sure the provider behind `model` has an API key, asking for one if needed
pub fn validate_api_key_for_model(model: &str, service: &LlmService) -> Result<()> {
    load_workspace_env()?;

    let family = ModelFamily::from_model_id(model);
    if let Some(family) = family {
        log::debug!("Checking {} API key for {}", family.display_name(), model);
    }

    match family {
        Some(ModelFamily::OpenAI) => service.ensure_openai_client(),
        Some(ModelFamily::Anthropic) => service.ensure_anthropic_client(),
        Some(ModelFamily::Gemini) => service.ensure_gemini_available(),
        None => bail!("Unsupported model '{}': expected a gpt*, claude* or gemini* model id", model),
    }
}

/// The explicit directory, or one derived from the project name.
/// An empty result means the current directory.
pub fn resolve_directory(directory: Option<PathBuf>, name: &str) -> PathBuf {
    let dir = directory.unwrap_or_else(|| slugify_project_name(name));
    if dir.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        dir
    }
}

/// Blank flag values count as not given
fn non_blank(flag: Option<&str>) -> Option<&str> {
    flag.map(str::trim).filter(|value| !value.is_empty())
}

/// Drive the agent to completion on a single-threaded runtime
pub fn run_build(agent: &dyn BuildFlow, request: &BuildRequest) -> Result<(), InitError> {
    println!();
    println!("{}", format!("Building project: {}", request.name).bold());
    println!();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| InitError::Build { message: e.to_string() })?;

    match runtime.block_on(agent.run_build_flow(request)) {
        Ok(true) => Ok(()),
        Ok(false) => Err(InitError::BuildFailed),
        Err(e) => Err(InitError::Build {
            message: format!("{:#}", e),
        }),
    }
}

fn print_tech_stack_menu() {
    println!();
    println!("{}", "Available Tech Stacks:".bright_cyan().bold());
    println!();
    for stack in TechStack::menu() {
        println!("{}. {}", stack.choice(), stack.display_name().bold());
        println!("   {}", stack.summary());
        println!("   Features: {}", stack.features());
        println!();
    }
}

fn print_model_menu() {
    println!();
    println!("{}", "Available AI Models:".bright_cyan().bold());
    println!();
    for option in MODELS.iter() {
        println!("{}. {}", option.code, option.display_name.bold());
        println!("   {}", option.blurb);
        println!();
    }
}
