// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::dag::Task;
use crate::engine::RunConfig;
use crate::exec::ShellCommand;

/// Plan file as read from TOML, before validation.
///
/// ```toml
/// [config]
/// max_concurrent = 4
/// max_retries = 1
///
/// [[task]]
/// id = "build"
/// cmd = "cargo build"
///
/// [[task]]
/// id = "test"
/// cmd = "cargo test"
/// after = ["build"]
/// ```
///
/// Tasks keep their file order, which is also the tie-break order when
/// several tasks become ready at the same time.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlanFile {
    /// Engine settings from `[config]`.
    #[serde(default)]
    pub config: RunConfig,

    /// All tasks from `[[task]]`.
    #[serde(default)]
    pub task: Vec<TaskConfig>,
}

/// Validated plan file.
///
/// Can only be obtained through `PlanFile::try_from(RawPlanFile)`, which
/// checks ids, dependencies, acyclicity and `[config]` sanity.
#[derive(Debug, Clone)]
pub struct PlanFile {
    pub config: RunConfig,
    pub task: Vec<TaskConfig>,
}

impl PlanFile {
    pub(crate) fn new_unchecked(config: RunConfig, task: Vec<TaskConfig>) -> Self {
        Self { config, task }
    }

    /// Tasks ready to hand to [`ParallelExecutor`](crate::engine::ParallelExecutor),
    /// in file order.
    pub fn tasks(&self) -> Vec<Task<ShellCommand>> {
        self.task.iter().map(TaskConfig::to_task).collect()
    }
}

/// One `[[task]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// Unique task id.
    pub id: String,

    /// The command to execute.
    pub cmd: String,

    /// Ids of tasks that must succeed first.
    #[serde(default)]
    pub after: Vec<String>,

    /// Optional working directory for the command.
    #[serde(default)]
    pub cwd: Option<PathBuf>,
}

impl TaskConfig {
    pub fn to_task(&self) -> Task<ShellCommand> {
        let payload = ShellCommand {
            cmd: self.cmd.clone(),
            cwd: self.cwd.clone(),
        };
        Task::with_payload(self.id.clone(), payload).after_all(self.after.iter().cloned())
    }
}
