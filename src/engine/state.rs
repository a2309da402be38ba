// src/engine/state.rs

//! Per-run bookkeeping.

use std::collections::{HashSet, VecDeque};

use tracing::debug;

use crate::dag::{TaskId, TaskResult};

/// Counters accumulated over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub tasks_total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub waves_executed: usize,
    /// Sum of wave sizes over executed waves.
    pub execution_slots: usize,
    /// Attempts made across all tasks, retries included.
    pub attempts: u32,
}

impl RunStats {
    /// Execution slots consumed per executed wave; 0.0 when no wave ran.
    pub fn avg_concurrency(&self) -> f64 {
        if self.waves_executed == 0 {
            return 0.0;
        }
        self.execution_slots as f64 / self.waves_executed as f64
    }

    pub fn retries(&self) -> u32 {
        self.attempts
            .saturating_sub((self.succeeded + self.failed) as u32)
    }
}

/// Transient state of one `execute_parallel` call.
///
/// Created fresh for every run and owned by that run's future, so a single
/// [`ParallelExecutor`](crate::engine::ParallelExecutor) can drive several
/// runs at once.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    queue: VecDeque<TaskId>,
    in_flight: HashSet<TaskId>,
    completed: HashSet<TaskId>,
    failed: HashSet<TaskId>,
    stats: RunStats,
}

impl RunState {
    /// Queue every task of the run, in planned order.
    pub fn new<I>(planned: I) -> Self
    where
        I: IntoIterator<Item = TaskId>,
    {
        let queue: VecDeque<TaskId> = planned.into_iter().collect();
        let stats = RunStats {
            tasks_total: queue.len(),
            ..RunStats::default()
        };
        Self {
            queue,
            stats,
            ..Self::default()
        }
    }

    /// Move the tasks of a wave from the queue to the in-flight set.
    pub fn start_wave(&mut self, wave: &[TaskId]) {
        self.queue.retain(|id| !wave.contains(id));
        self.in_flight.extend(wave.iter().cloned());
        self.stats.execution_slots += wave.len();
    }

    /// Record the final outcome of one task.
    pub fn record<R>(&mut self, result: &TaskResult<R>) {
        self.in_flight.remove(&result.task_id);
        self.stats.attempts += result.attempts;

        if result.success() {
            self.stats.succeeded += 1;
            self.completed.insert(result.task_id.clone());
        } else {
            self.stats.failed += 1;
            self.failed.insert(result.task_id.clone());
        }
    }

    pub fn finish_wave(&mut self) {
        self.stats.waves_executed += 1;
        debug!(
            waves_executed = self.stats.waves_executed,
            queued = self.queue.len(),
            completed = self.completed.len(),
            failed = self.failed.len(),
            "wave bookkeeping updated"
        );
    }

    pub fn queued(&self) -> impl Iterator<Item = &TaskId> {
        self.queue.iter()
    }

    pub fn in_flight(&self) -> &HashSet<TaskId> {
        &self.in_flight
    }

    pub fn completed(&self) -> &HashSet<TaskId> {
        &self.completed
    }

    pub fn failed(&self) -> &HashSet<TaskId> {
        &self.failed
    }

    /// True once nothing is queued or running.
    pub fn is_finished(&self) -> bool {
        self.queue.is_empty() && self.in_flight.is_empty()
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Drop all bookkeeping.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
