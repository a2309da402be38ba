// src/dag/task.rs

//! Task definitions and per-task results.

use std::time::Duration;

use crate::errors::TaskFailure;

/// Canonical task identifier type used throughout the crate.
pub type TaskId = String;

/// A unit of work: identity, declared dependencies, and an opaque payload
/// that is handed to the executor unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task<P = ()> {
    pub id: TaskId,
    /// Ids of tasks that must finish before this one starts, in declaration order.
    pub depends_on: Vec<TaskId>,
    pub payload: P,
}

impl Task<()> {
    /// A task without payload.
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self::with_payload(id, ())
    }
}

impl<P> Task<P> {
    pub fn with_payload(id: impl Into<TaskId>, payload: P) -> Self {
        Self {
            id: id.into(),
            depends_on: Vec::new(),
            payload,
        }
    }

    /// Add a single dependency.
    pub fn after(mut self, dep: impl Into<TaskId>) -> Self {
        self.depends_on.push(dep.into());
        self
    }

    /// Add several dependencies, keeping their order.
    pub fn after_all<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TaskId>,
    {
        self.depends_on.extend(deps.into_iter().map(Into::into));
        self
    }
}

/// Final outcome of one task in one run, after all retries.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskResult<R> {
    pub task_id: TaskId,
    /// The executor's value, or the last failure seen.
    pub outcome: Result<R, TaskFailure>,
    /// Number of attempts made (at least 1).
    pub attempts: u32,
    /// Wall-clock time from the first attempt to the final outcome,
    /// including backoff delays.
    pub duration: Duration,
}

impl<R> TaskResult<R> {
    pub fn succeeded(task_id: TaskId, value: R, attempts: u32, duration: Duration) -> Self {
        Self {
            task_id,
            outcome: Ok(value),
            attempts,
            duration,
        }
    }

    pub fn failed(
        task_id: TaskId,
        failure: TaskFailure,
        attempts: u32,
        duration: Duration,
    ) -> Self {
        Self {
            task_id,
            outcome: Err(failure),
            attempts,
            duration,
        }
    }

    pub fn success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn value(&self) -> Option<&R> {
        self.outcome.as_ref().ok()
    }

    pub fn failure(&self) -> Option<&TaskFailure> {
        self.outcome.as_ref().err()
    }

    /// Human-readable message of the final failure, if any.
    pub fn error_message(&self) -> Option<String> {
        self.failure().map(|f| f.to_string())
    }
}
