// src/errors.rs

//! Crate-wide error types.
//!
//! [`TaskwaveError`] covers everything that aborts a run (structural problems
//! with the task graph, wave aborts, bad configuration). [`TaskFailure`] is the
//! per-attempt failure of a single task; it never aborts a run by itself and
//! ends up inside a [`TaskResult`](crate::dag::TaskResult).

use std::time::Duration;

use thiserror::Error;

use crate::dag::TaskId;

#[derive(Error, Debug)]
pub enum TaskwaveError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Duplicate task id: {0}")]
    DuplicateTask(TaskId),

    #[error("Circular dependency detected: {}", .0.join(" -> "))]
    CircularDependency(Vec<TaskId>),

    #[error("Task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency { task: TaskId, dependency: TaskId },

    #[error("Unable to schedule remaining tasks (unsatisfiable dependencies): {}", .0.join(", "))]
    Unschedulable(Vec<TaskId>),

    #[error("Wave {wave} failed, aborting run. Failed tasks: {}", .failed.join(", "))]
    WaveAborted { wave: usize, failed: Vec<TaskId> },

    #[error("No executor supplied for this run")]
    MissingExecutor,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TaskwaveError {
    /// Whether this error was raised before any task was handed to an executor.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            TaskwaveError::DuplicateTask(_)
                | TaskwaveError::CircularDependency(_)
                | TaskwaveError::UnknownDependency { .. }
                | TaskwaveError::Unschedulable(_)
        )
    }
}

/// Why a single attempt of a task did not succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskFailure {
    /// The executor returned an error (or panicked).
    #[error("{0}")]
    Execution(String),

    /// The attempt did not settle within the configured timeout.
    #[error("task timed out after {}ms", .0.as_millis())]
    TimedOut(Duration),
}

impl TaskFailure {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TaskFailure::TimedOut(_))
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TaskwaveError>;
