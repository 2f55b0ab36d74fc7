use serde::{Deserialize, Serialize};

/// One generation step of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildTask {
    Ui,
    Auth,
    Data,
}

impl BuildTask {
    /// Tasks in execution order
    pub const PLAN: [BuildTask; 3] = [BuildTask::Ui, BuildTask::Auth, BuildTask::Data];

    pub fn label(&self) -> &'static str {
        match self {
            BuildTask::Ui => "UI",
            BuildTask::Auth => "Auth",
            BuildTask::Data => "Data",
        }
    }

    pub fn agent_name(&self) -> &'static str {
        match self {
            BuildTask::Ui => "ui_agent",
            BuildTask::Auth => "auth_agent",
            BuildTask::Data => "data_agent",
        }
    }
}
