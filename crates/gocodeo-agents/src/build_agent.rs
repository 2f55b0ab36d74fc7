use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use colored::Colorize;

use gocodeo_llm_api::{LlmClient, LlmService};
use gocodeo_logging::safe_truncate;
use gocodeo_models::{BuildRequest, SupabaseCredentials, TechStack};

use crate::files::{parse_generated_files, write_generated_file};
use crate::flow::BuildFlow;
use crate::prompts::messages_for;
use crate::state::{load_project_state, ProjectStage, ProjectState};
use crate::task::BuildTask;

const ENV_LOCAL: &str = ".env.local";

enum ClientSource {
    Service(Arc<LlmService>),
    Fixed(Arc<dyn LlmClient>),
}

/// Generates a project in stages, one LLM call per [`BuildTask`]
pub struct BuildAgent {
    project_dir: PathBuf,
    clients: ClientSource,
}

impl BuildAgent {
    /// Agent that asks `service` for a client matching the request's model
    pub fn new(project_dir: impl Into<PathBuf>, service: Arc<LlmService>) -> Self {
        Self {
            project_dir: project_dir.into(),
            clients: ClientSource::Service(service),
        }
    }

    /// Agent that sends every task to the same client
    pub fn with_client(project_dir: impl Into<PathBuf>, client: Arc<dyn LlmClient>) -> Self {
        Self {
            project_dir: project_dir.into(),
            clients: ClientSource::Fixed(client),
        }
    }

    fn client_for(&self, task: BuildTask, request: &BuildRequest) -> Result<Arc<dyn LlmClient>> {
        match &self.clients {
            ClientSource::Service(service) => service.client_for_model(&request.model, task.agent_name()),
            ClientSource::Fixed(client) => Ok(Arc::clone(client)),
        }
    }

    fn load_state(&self, request: &BuildRequest) -> Result<ProjectState> {
        match load_project_state(&self.project_dir)? {
            Some(state) if state.matches(request) => {
                if state.stage != ProjectStage::Complete && !state.completed.is_empty() {
                    println!(
                        "{} {}",
                        "↻".bright_cyan(),
                        format!("Resuming build {} ({} of {} tasks done)", state.build_id, state.completed.len(), BuildTask::PLAN.len())
                            .cyan()
                    );
                }
                Ok(state)
            }
            Some(state) => {
                log::warn!(
                    "Discarding saved state for '{}' ({}): project details changed",
                    state.name,
                    state.tech_stack.display_name()
                );
                Ok(ProjectState::new(request))
            }
            None => Ok(ProjectState::new(request)),
        }
    }

    /// Run one task. `Ok(false)` means the model produced no usable files.
    async fn run_task(&self, task: BuildTask, request: &BuildRequest, state: &mut ProjectState) -> Result<bool> {
        let client = self.client_for(task, request)?;
        let messages = messages_for(task, request, &state.written_files());

        log::debug!("{} sending {} messages to {}", task.agent_name(), messages.len(), client.model());
        let response = client
            .chat_completion(&messages)
            .await
            .with_context(|| format!("{} agent request failed", task.label()))?;

        let files = parse_generated_files(&response)
            .with_context(|| format!("{} agent returned an invalid file", task.label()))?;

        let mut written = Vec::new();
        for file in &files {
            if file.path == Path::new(ENV_LOCAL) {
                log::warn!("Ignoring generated {}; it is managed by gocodeo", ENV_LOCAL);
                continue;
            }
            write_generated_file(&self.project_dir, file)?;
            println!("   {} {}", "+".green(), file.path.display());
            written.push(file.path.clone());
        }

        if written.is_empty() {
            println!("{}", format!("✗ {} Agent produced no files", task.label()).red());
            log::debug!("Response without file blocks: {}", safe_truncate(&response, 200));
            return Ok(false);
        }

        println!(
            "{}",
            format!("✓ {} Agent wrote {} file(s)", task.label(), written.len()).green()
        );
        state.record_task(task, written);
        state.save(&self.project_dir)?;
        Ok(true)
    }

    fn fail(&self, state: &mut ProjectState) {
        state.mark(ProjectStage::Failed);
        if let Err(e) = state.save(&self.project_dir) {
            log::warn!("Failed to save project state: {:#}", e);
        }
    }

    fn print_summary(&self, request: &BuildRequest, state: &ProjectState) {
        println!();
        println!("{}", "═".repeat(60).bright_blue());
        println!("{}", format!("🎉 {} is ready", request.name).bright_green().bold());
        println!("{}", "═".repeat(60).bright_blue());
        println!("{} {}", "Tech stack:".bright_cyan(), request.tech_stack.display_name());
        println!("{} {}", "Model:".bright_cyan(), request.model);
        println!("{} {}", "Files:".bright_cyan(), state.written_files().len().to_string().bright_yellow());
        println!();
        println!("{}", "Next steps:".bright_cyan().bold());
        println!("  cd {}", self.project_dir.display());
        println!("  npm install");
        println!("  npm run dev");
        println!();
    }
}

#[async_trait]
impl BuildFlow for BuildAgent {
    async fn run_build_flow(&self, request: &BuildRequest) -> Result<bool> {
        fs::create_dir_all(&self.project_dir)
            .with_context(|| format!("Failed to create {}", self.project_dir.display()))?;

        let mut state = self.load_state(request)?;

        if request.tech_stack == TechStack::NextSupabase {
            match &request.supabase {
                Some(credentials) => {
                    write_supabase_env(&self.project_dir, credentials)?;
                }
                None => log::warn!("No Supabase credentials provided; {} not written", ENV_LOCAL),
            }
        }

        state.mark(ProjectStage::InProgress);
        state.save(&self.project_dir)?;

        for (index, task) in BuildTask::PLAN.iter().copied().enumerate() {
            if state.is_complete(task) {
                println!("{}", format!("⏭  Task{}: {} Agent already done", index + 1, task.label()).dimmed());
                continue;
            }

            println!("{}", format!("🔨 Task{}: Running {} Agent...", index + 1, task.label()).bright_cyan().bold());

            match self.run_task(task, request, &mut state).await {
                Ok(true) => {}
                Ok(false) => {
                    self.fail(&mut state);
                    return Ok(false);
                }
                Err(e) => {
                    self.fail(&mut state);
                    return Err(e);
                }
            }
        }

        state.mark(ProjectStage::Complete);
        state.save(&self.project_dir)?;
        self.print_summary(request, &state);
        Ok(true)
    }
}

/// Write the Supabase connection settings the generated app reads at runtime
pub fn write_supabase_env(project_dir: &Path, credentials: &SupabaseCredentials) -> Result<PathBuf> {
    let path = project_dir.join(ENV_LOCAL);
    let contents = format!(
        "NEXT_PUBLIC_SUPABASE_URL={}\nNEXT_PUBLIC_SUPABASE_ANON_KEY={}\nSUPABASE_ACCESS_TOKEN={}\n",
        credentials.url, credentials.anon_key, credentials.access_token
    );
    fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Wrote Supabase settings to {}", path.display());
    Ok(path)
}
