use std::collections::HashSet;

use tracing::{debug, info};

use crate::dag::graph::DependencyGraph;
use crate::dag::task::TaskId;
use crate::engine::RunConfig;
use crate::errors::{Result, TaskwaveError};

/// A group of tasks that may run concurrently: every dependency of every
/// task in the wave was placed in an earlier wave.
pub type Wave = Vec<TaskId>;

/// Ordered sequence of waves for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WavePlan {
    waves: Vec<Wave>,
}

impl WavePlan {
    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    pub fn len(&self) -> usize {
        self.waves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    /// Total number of task slots across all waves.
    pub fn task_count(&self) -> usize {
        self.waves.iter().map(Vec::len).sum()
    }

    /// Index of the wave containing `task`, if planned.
    pub fn wave_index_of(&self, task: &str) -> Option<usize> {
        self.waves
            .iter()
            .position(|wave| wave.iter().any(|id| id == task))
    }

    pub fn into_waves(self) -> Vec<Wave> {
        self.waves
    }
}

/// Turns a validated [`DependencyGraph`] into a [`WavePlan`].
///
/// The concurrency bound is enforced here, statically: a wave never holds
/// more than `max_concurrent` tasks, and with parallelism disabled every wave
/// holds exactly one.
#[derive(Debug, Clone, Copy)]
pub struct WaveScheduler {
    max_concurrent: usize,
    enable_parallel: bool,
}

impl WaveScheduler {
    /// `max_concurrent` of 0 is treated as 1.
    pub fn new(max_concurrent: usize, enable_parallel: bool) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
            enable_parallel,
        }
    }

    pub fn from_config(cfg: &RunConfig) -> Self {
        Self::new(cfg.max_concurrent, cfg.enable_parallel)
    }

    /// Compute the wave plan.
    ///
    /// Repeatedly collects every remaining task whose dependencies are all
    /// complete, in submission order. If nothing is ready while tasks remain
    /// (dangling or circular dependency), fails with
    /// [`TaskwaveError::Unschedulable`].
    pub fn plan<P>(&self, graph: &DependencyGraph<'_, P>) -> Result<WavePlan> {
        let mut completed: HashSet<&str> = HashSet::with_capacity(graph.len());
        let mut remaining: Vec<&str> = graph.task_ids().collect();
        let mut waves: Vec<Wave> = Vec::new();

        while !remaining.is_empty() {
            let ready: Vec<&str> = remaining
                .iter()
                .copied()
                .filter(|id| {
                    graph
                        .dependencies_of(id)
                        .iter()
                        .all(|dep| completed.contains(dep.as_str()))
                })
                .collect();

            if ready.is_empty() {
                return Err(TaskwaveError::Unschedulable(
                    remaining.iter().map(|s| s.to_string()).collect(),
                ));
            }

            remaining.retain(|id| !ready.contains(id));
            completed.extend(ready.iter().copied());

            debug!(ready = ?ready, "dependency level resolved");
            self.push_level(&mut waves, &ready);
        }

        info!(
            waves = waves.len(),
            tasks = graph.len(),
            max_concurrent = self.max_concurrent,
            parallel = self.enable_parallel,
            "wave plan computed"
        );

        Ok(WavePlan { waves })
    }

    fn push_level(&self, waves: &mut Vec<Wave>, ready: &[&str]) {
        let chunk_size = if self.enable_parallel {
            self.max_concurrent
        } else {
            1
        };

        for chunk in ready.chunks(chunk_size) {
            waves.push(chunk.iter().map(|s| s.to_string()).collect());
        }
    }
}
