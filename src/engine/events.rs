// src/engine/events.rs

//! Progress notifications emitted while a run executes.
//!
//! Callers opt in by passing an `mpsc::UnboundedSender<ExecutionEvent>` in
//! [`RunOptions`](crate::engine::RunOptions) and draining the receiver at
//! their own pace. The engine never blocks on the channel and ignores a
//! dropped receiver.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::dag::TaskId;

/// Summary carried by [`ExecutionEvent::RunCompleted`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub tasks_count: usize,
    pub waves_count: usize,
    pub total_time: Duration,
    pub avg_concurrency: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionEvent {
    /// Planning succeeded; execution is about to start.
    RunStarted { tasks_count: usize, waves_count: usize },
    /// A wave was launched.
    WaveStarted { wave: usize, tasks: Vec<TaskId> },
    /// An attempt failed and the task will be retried after `delay`.
    TaskRetrying {
        task: TaskId,
        attempt: u32,
        delay: Duration,
        error: String,
    },
    /// Every task of a wave has settled.
    WaveCompleted {
        wave: usize,
        succeeded: usize,
        failed: Vec<TaskId>,
    },
    /// All waves ran (with or without task failures).
    RunCompleted(RunSummary),
}

/// Optional event channel; a no-op when absent.
#[derive(Debug, Clone, Default)]
pub(crate) struct EventSink {
    tx: Option<mpsc::UnboundedSender<ExecutionEvent>>,
}

impl EventSink {
    pub(crate) fn new(tx: Option<mpsc::UnboundedSender<ExecutionEvent>>) -> Self {
        Self { tx }
    }

    pub(crate) fn emit(&self, event: ExecutionEvent) {
        if let Some(ref tx) = self.tx {
            let _ = tx.send(event);
        }
    }
}
