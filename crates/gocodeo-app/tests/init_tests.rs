use std::cell::RefCell;
use std::collections::VecDeque;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use gocodeo::commands::resolve_directory;
use gocodeo::{AgentFactory, InitArgs, InitCommand, InitError, Prompter};
use gocodeo_agents::BuildFlow;
use gocodeo_llm_api::{BackendType, KeyPrompter, LlmService};
use gocodeo_models::{BuildRequest, TechStack, DEFAULT_MODEL};
use pretty_assertions::assert_eq;
use serial_test::serial;
use tempfile::TempDir;

/// Prompter that answers from a script and records every question in order
#[derive(Default)]
struct ScriptedPrompter {
    answers: RefCell<VecDeque<String>>,
    secrets: RefCell<VecDeque<String>>,
    confirmation: Option<bool>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    fn with_answers(answers: &[&str]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().map(|a| a.to_string()).collect()),
            ..Default::default()
        }
    }

    fn secrets(self, secrets: &[&str]) -> Self {
        *self.secrets.borrow_mut() = secrets.iter().map(|s| s.to_string()).collect();
        self
    }

    fn confirming(mut self, answer: bool) -> Self {
        self.confirmation = Some(answer);
        self
    }

    fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    fn secret_prompts(&self) -> usize {
        self.asked().iter().filter(|q| q.starts_with("secret:")).count()
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(&self, message: &str, default: Option<&str>) -> Result<String> {
        self.asked.borrow_mut().push(format!("prompt:{}", message));
        let answer = self
            .answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted answer for '{}'", message))?;
        match (answer.is_empty(), default) {
            (true, Some(default)) => Ok(default.to_string()),
            _ => Ok(answer),
        }
    }

    fn prompt_secret(&self, message: &str) -> Result<String> {
        self.asked.borrow_mut().push(format!("secret:{}", message));
        self.secrets
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted secret for '{}'", message))
    }

    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        self.asked.borrow_mut().push(format!("confirm:{}", message));
        Ok(self.confirmation.unwrap_or(default))
    }
}

struct EmptyKeyPrompter;

impl KeyPrompter for EmptyKeyPrompter {
    fn prompt_api_key(&self, _backend: BackendType) -> Result<String> {
        Ok(String::new())
    }
}

#[derive(Clone, Copy)]
enum Outcome {
    Built,
    Falsy,
    Fails(&'static str),
}

struct FakeFlow {
    outcome: Outcome,
    requests: Arc<Mutex<Vec<BuildRequest>>>,
}

#[async_trait]
impl BuildFlow for FakeFlow {
    async fn run_build_flow(&self, request: &BuildRequest) -> Result<bool> {
        self.requests.lock().unwrap().push(request.clone());
        match self.outcome {
            Outcome::Built => Ok(true),
            Outcome::Falsy => Ok(false),
            Outcome::Fails(message) => Err(anyhow!(message)),
        }
    }
}

/// Factory that records which directories it was asked to build in
struct FakeFactory {
    outcome: Outcome,
    dirs: Mutex<Vec<PathBuf>>,
    requests: Arc<Mutex<Vec<BuildRequest>>>,
}

impl FakeFactory {
    fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            dirs: Mutex::new(Vec::new()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn created(&self) -> usize {
        self.dirs.lock().unwrap().len()
    }

    fn only_request(&self) -> BuildRequest {
        let requests = self.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        requests[0].clone()
    }
}

impl AgentFactory for FakeFactory {
    fn create(&self, project_dir: &Path) -> Box<dyn BuildFlow> {
        self.dirs.lock().unwrap().push(project_dir.to_path_buf());
        Box::new(FakeFlow {
            outcome: self.outcome,
            requests: Arc::clone(&self.requests),
        })
    }
}

/// Service with every provider key configured and no environment lookups
fn keyed_service() -> LlmService {
    LlmService::without_env(Arc::new(EmptyKeyPrompter))
        .with_api_key(BackendType::OpenAI, "sk-test")
        .with_api_key(BackendType::Anthropic, "sk-ant-test")
        .with_api_key(BackendType::Gemini, "gm-test")
}

/// Point the workspace env at an empty temp dir for the duration of a test
struct IsolatedHome {
    _temp: TempDir,
}

impl IsolatedHome {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        env::set_var("GOCODEO_HOME", temp.path());
        Self { _temp: temp }
    }
}

impl Drop for IsolatedHome {
    fn drop(&mut self) {
        env::remove_var("GOCODEO_HOME");
    }
}

fn args(dir: &Path) -> InitArgs {
    InitArgs {
        name: Some("Todo App".to_string()),
        description: Some("Track daily tasks".to_string()),
        directory: Some(dir.to_path_buf()),
        tech_stack: None,
        model: None,
    }
}

#[test]
#[serial]
fn test_non_supabase_stack_skips_credentials() {
    let _home = IsolatedHome::new();
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("todo");
    let prompter = ScriptedPrompter::default();
    let service = keyed_service();
    let factory = FakeFactory::new(Outcome::Built);

    let mut init = args(&project);
    init.tech_stack = Some("2".to_string());
    init.model = Some("gpt-4.1".to_string());

    InitCommand::new(&prompter, &service, &factory).run(init).unwrap();

    assert_eq!(prompter.secret_prompts(), 0);
    assert!(prompter.asked().is_empty());
    assert!(project.is_dir());

    let request = factory.only_request();
    assert_eq!(request.tech_stack, TechStack::NextFirebase);
    assert_eq!(request.supabase, None);
    assert_eq!(request.model, "gpt-4.1");
}

#[test]
#[serial]
fn test_supabase_credentials_asked_before_model() {
    let _home = IsolatedHome::new();
    let temp = TempDir::new().unwrap();
    let prompter = ScriptedPrompter::with_answers(&["", "2"]).secrets(&["https://abc.supabase.co", "anon", "token"]);
    let service = keyed_service();
    let factory = FakeFactory::new(Outcome::Built);

    InitCommand::new(&prompter, &service, &factory)
        .run(args(&temp.path().join("todo")))
        .unwrap();

    assert_eq!(
        prompter.asked(),
        vec![
            "prompt:Select your tech stack (enter number)",
            "secret:Supabase Project URL",
            "secret:Supabase Anon Key",
            "secret:Supabase Access Token",
            "prompt:Select AI model to use (enter number) [1/2/3]",
        ]
    );

    let request = factory.only_request();
    assert_eq!(request.tech_stack, TechStack::NextSupabase);
    assert_eq!(request.model, "gpt-4.1");
    let credentials = request.supabase.unwrap();
    assert_eq!(credentials.url, "https://abc.supabase.co");
    assert_eq!(credentials.anon_key, "anon");
    assert_eq!(credentials.access_token, "token");
}

#[test]
#[serial]
fn test_missing_name_and_description_are_prompted() {
    let _home = IsolatedHome::new();
    let temp = TempDir::new().unwrap();
    let prompter = ScriptedPrompter::with_answers(&["Blog", "Write posts"]);
    let service = keyed_service();
    let factory = FakeFactory::new(Outcome::Built);

    let init = InitArgs {
        directory: Some(temp.path().join("blog")),
        tech_stack: Some("3".to_string()),
        model: Some("claude-3-7-sonnet-20250219".to_string()),
        ..Default::default()
    };
    InitCommand::new(&prompter, &service, &factory).run(init).unwrap();

    assert_eq!(
        prompter.asked(),
        vec!["prompt:What's your project name?", "prompt:Describe your application"]
    );
    let request = factory.only_request();
    assert_eq!(request.name, "Blog");
    assert_eq!(request.description, "Write posts");
}

#[test]
#[serial]
fn test_unknown_model_choice_uses_default() {
    let _home = IsolatedHome::new();
    let temp = TempDir::new().unwrap();
    let prompter = ScriptedPrompter::with_answers(&["9"]);
    let service = keyed_service();
    let factory = FakeFactory::new(Outcome::Built);

    let mut init = args(&temp.path().join("todo"));
    init.tech_stack = Some("3".to_string());
    InitCommand::new(&prompter, &service, &factory).run(init).unwrap();

    assert_eq!(factory.only_request().model, DEFAULT_MODEL);
}

#[test]
#[serial]
fn test_unknown_tech_stack_is_rejected() {
    let _home = IsolatedHome::new();
    let temp = TempDir::new().unwrap();
    let prompter = ScriptedPrompter::default();
    let service = keyed_service();
    let factory = FakeFactory::new(Outcome::Built);

    let mut init = args(&temp.path().join("todo"));
    init.tech_stack = Some("7".to_string());
    let err = InitCommand::new(&prompter, &service, &factory).run(init).unwrap_err();

    assert!(matches!(err, InitError::UnknownTechStack(ref choice) if choice == "7"));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(factory.created(), 0);
}

#[test]
#[serial]
fn test_declined_overwrite_aborts_without_touching_directory() {
    let _home = IsolatedHome::new();
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("todo");
    fs::create_dir_all(&project).unwrap();
    fs::write(project.join("README.md"), "existing").unwrap();

    let prompter = ScriptedPrompter::default().confirming(false);
    let service = keyed_service();
    let factory = FakeFactory::new(Outcome::Built);

    let mut init = args(&project);
    init.tech_stack = Some("2".to_string());
    init.model = Some("gpt-4.1".to_string());
    let err = InitCommand::new(&prompter, &service, &factory).run(init).unwrap_err();

    assert!(matches!(err, InitError::Aborted));
    assert_eq!(err.to_string(), "Aborted!");
    assert_eq!(prompter.asked(), vec!["confirm:Do you want to continue anyway?"]);
    assert_eq!(factory.created(), 0);
    let entries: Vec<_> = fs::read_dir(&project).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
#[serial]
fn test_accepted_overwrite_builds() {
    let _home = IsolatedHome::new();
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("todo");
    fs::create_dir_all(&project).unwrap();
    fs::write(project.join("README.md"), "existing").unwrap();

    let prompter = ScriptedPrompter::default().confirming(true);
    let service = keyed_service();
    let factory = FakeFactory::new(Outcome::Built);

    let mut init = args(&project);
    init.tech_stack = Some("2".to_string());
    init.model = Some("gemini-2.5-pro-preview-03-25".to_string());
    InitCommand::new(&prompter, &service, &factory).run(init).unwrap();

    assert_eq!(factory.created(), 1);
}

#[test]
#[serial]
fn test_falsy_build_result_fails() {
    let _home = IsolatedHome::new();
    let temp = TempDir::new().unwrap();
    let prompter = ScriptedPrompter::default();
    let service = keyed_service();
    let factory = FakeFactory::new(Outcome::Falsy);

    let mut init = args(&temp.path().join("todo"));
    init.tech_stack = Some("2".to_string());
    init.model = Some("gpt-4.1".to_string());
    let err = InitCommand::new(&prompter, &service, &factory).run(init).unwrap_err();

    assert!(matches!(err, InitError::BuildFailed));
    assert_eq!(err.to_string(), "Build failed!");
    assert_eq!(err.exit_code(), 1);
}

#[test]
#[serial]
fn test_build_error_keeps_message() {
    let _home = IsolatedHome::new();
    let temp = TempDir::new().unwrap();
    let prompter = ScriptedPrompter::default();
    let service = keyed_service();
    let factory = FakeFactory::new(Outcome::Fails("model overloaded"));

    let mut init = args(&temp.path().join("todo"));
    init.tech_stack = Some("2".to_string());
    init.model = Some("gpt-4.1".to_string());
    let err = InitCommand::new(&prompter, &service, &factory).run(init).unwrap_err();

    match &err {
        InitError::Build { message } => assert_eq!(message, "model overloaded"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.to_string(), "Error: model overloaded");
    assert_eq!(err.exit_code(), 1);
}

#[test]
#[serial]
fn test_missing_api_key_fails_validation_before_directory() {
    let _home = IsolatedHome::new();
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("todo");
    let prompter = ScriptedPrompter::default();
    let service = LlmService::without_env(Arc::new(EmptyKeyPrompter));
    let factory = FakeFactory::new(Outcome::Built);

    let mut init = args(&project);
    init.tech_stack = Some("2".to_string());
    init.model = Some("claude-3-7-sonnet-20250219".to_string());
    let err = InitCommand::new(&prompter, &service, &factory).run(init).unwrap_err();

    assert!(matches!(err, InitError::ApiKeyValidation { .. }));
    assert!(err.to_string().starts_with("Error validating API key: Anthropic API key is required"));
    assert!(!project.exists());
    assert_eq!(factory.created(), 0);
}

#[test]
#[serial]
fn test_unknown_model_family_fails_validation() {
    let _home = IsolatedHome::new();
    let temp = TempDir::new().unwrap();
    let prompter = ScriptedPrompter::default();
    let service = keyed_service();
    let factory = FakeFactory::new(Outcome::Built);

    let mut init = args(&temp.path().join("todo"));
    init.tech_stack = Some("2".to_string());
    init.model = Some("llama-3-70b".to_string());
    let err = InitCommand::new(&prompter, &service, &factory).run(init).unwrap_err();

    assert!(err.to_string().contains("Unsupported model 'llama-3-70b'"));
    assert_eq!(factory.created(), 0);
}

#[test]
#[serial]
fn test_interrupted_prompt_aborts() {
    let _home = IsolatedHome::new();
    let temp = TempDir::new().unwrap();
    let prompter = ScriptedPrompter::default();
    let service = keyed_service();
    let factory = FakeFactory::new(Outcome::Built);

    // No scripted answer for the tech stack menu
    let err = InitCommand::new(&prompter, &service, &factory)
        .run(args(&temp.path().join("todo")))
        .unwrap_err();

    assert!(matches!(err, InitError::Aborted));
    assert_eq!(factory.created(), 0);
}

#[test]
fn test_directory_defaults_to_slug() {
    assert_eq!(resolve_directory(None, "My Todo App"), PathBuf::from("my-todo-app"));
    assert_eq!(
        resolve_directory(Some(PathBuf::from("custom")), "My Todo App"),
        PathBuf::from("custom")
    );
}

#[test]
fn test_empty_directory_name_means_current_directory() {
    assert_eq!(resolve_directory(None, ""), PathBuf::from("."));
    assert_eq!(resolve_directory(Some(PathBuf::new()), "Todo App"), PathBuf::from("."));
}

#[test]
#[serial]
fn test_empty_project_name_confirms_before_using_current_directory() {
    let _home = IsolatedHome::new();
    let prompter = ScriptedPrompter::default().confirming(false);
    let service = keyed_service();
    let factory = FakeFactory::new(Outcome::Built);

    // The test runs inside the crate directory, which is never empty
    let init = InitArgs {
        name: Some(String::new()),
        description: Some("Track daily tasks".to_string()),
        directory: None,
        tech_stack: Some("2".to_string()),
        model: Some("gpt-4.1".to_string()),
    };
    let err = InitCommand::new(&prompter, &service, &factory).run(init).unwrap_err();

    assert!(matches!(err, InitError::Aborted));
    assert_eq!(prompter.asked(), vec!["confirm:Do you want to continue anyway?"]);
    assert_eq!(factory.created(), 0);
}

#[test]
#[serial]
fn test_existing_empty_directory_needs_no_confirmation() {
    let _home = IsolatedHome::new();
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("todo");
    fs::create_dir_all(&project).unwrap();

    let prompter = ScriptedPrompter::default();
    let service = keyed_service();
    let factory = FakeFactory::new(Outcome::Built);

    let mut init = args(&project);
    init.tech_stack = Some("2".to_string());
    init.model = Some("gpt-4.1".to_string());
    InitCommand::new(&prompter, &service, &factory).run(init).unwrap();

    assert!(prompter.asked().is_empty());
    assert!(project.is_dir());
    assert_eq!(factory.created(), 1);
    assert_eq!(factory.only_request().name, "Todo App");
}

#[test]
#[serial]
fn test_unreadable_directory_is_reported_not_reused() {
    let _home = IsolatedHome::new();
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("todo");
    fs::write(&project, "not a directory").unwrap();

    let prompter = ScriptedPrompter::default().confirming(true);
    let service = keyed_service();
    let factory = FakeFactory::new(Outcome::Built);

    let mut init = args(&project);
    init.tech_stack = Some("2".to_string());
    init.model = Some("gpt-4.1".to_string());
    let err = InitCommand::new(&prompter, &service, &factory).run(init).unwrap_err();

    match &err {
        InitError::Directory { path, .. } => assert_eq!(path, &project),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.exit_code(), 1);
    assert!(prompter.asked().is_empty());
    assert_eq!(factory.created(), 0);
}

#[test]
#[serial]
fn test_blank_stack_and_model_flags_show_menus() {
    let _home = IsolatedHome::new();
    let temp = TempDir::new().unwrap();
    let prompter = ScriptedPrompter::with_answers(&["2", ""]);
    let service = keyed_service();
    let factory = FakeFactory::new(Outcome::Built);

    let mut init = args(&temp.path().join("todo"));
    init.tech_stack = Some(String::new());
    init.model = Some("  ".to_string());
    InitCommand::new(&prompter, &service, &factory).run(init).unwrap();

    assert_eq!(
        prompter.asked(),
        vec![
            "prompt:Select your tech stack (enter number)",
            "prompt:Select AI model to use (enter number) [1/2/3]",
        ]
    );
    let request = factory.only_request();
    assert_eq!(request.tech_stack, TechStack::NextFirebase);
    assert_eq!(request.model, DEFAULT_MODEL);
}
