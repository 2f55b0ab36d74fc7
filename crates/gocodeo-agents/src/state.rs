use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gocodeo_models::{BuildRequest, TechStack};

use crate::files::GOCODEO_DIR;
use crate::task::BuildTask;

const STATE_FILE: &str = "state.json";

/// Where a project's build currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStage {
    Initialized,
    InProgress,
    Complete,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task: BuildTask,
    pub files: Vec<PathBuf>,
    pub completed_at: DateTime<Utc>,
}

/// Persisted progress of a build, stored at `<project>/.gocodeo/state.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectState {
    pub build_id: Uuid,
    pub name: String,
    pub description: String,
    pub tech_stack: TechStack,
    pub model: String,
    pub stage: ProjectStage,
    #[serde(default)]
    pub completed: Vec<TaskRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectState {
    pub fn new(request: &BuildRequest) -> Self {
        let now = Utc::now();
        Self {
            build_id: Uuid::new_v4(),
            name: request.name.clone(),
            description: request.description.clone(),
            tech_stack: request.tech_stack,
            model: request.model.clone(),
            stage: ProjectStage::Initialized,
            completed: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn path(project_dir: &Path) -> PathBuf {
        project_dir.join(GOCODEO_DIR).join(STATE_FILE)
    }

    /// Whether this state was recorded for the same project and stack
    pub fn matches(&self, request: &BuildRequest) -> bool {
        self.name == request.name && self.tech_stack == request.tech_stack
    }

    pub fn is_complete(&self, task: BuildTask) -> bool {
        self.completed.iter().any(|record| record.task == task)
    }

    pub fn record_task(&mut self, task: BuildTask, files: Vec<PathBuf>) {
        self.completed.retain(|record| record.task != task);
        self.completed.push(TaskRecord {
            task,
            files,
            completed_at: Utc::now(),
        });
        self.updated_at = Utc::now();
    }

    pub fn mark(&mut self, stage: ProjectStage) {
        self.stage = stage;
        self.updated_at = Utc::now();
    }

    /// Project-relative files written by completed tasks, in write order
    pub fn written_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = Vec::new();
        for path in self.completed.iter().flat_map(|record| record.files.iter()) {
            if !files.contains(path) {
                files.push(path.clone());
            }
        }
        files
    }

    pub fn save(&self, project_dir: &Path) -> Result<()> {
        let path = Self::path(project_dir);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize project state")?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// Load the saved state of a project, if any
pub fn load_project_state(project_dir: &Path) -> Result<Option<ProjectState>> {
    let path = ProjectState::path(project_dir);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let state = serde_json::from_str(&content)
        .with_context(|| format!("Corrupt project state in {}", path.display()))?;
    Ok(Some(state))
}
