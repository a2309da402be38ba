// src/engine/parallel.rs

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::dag::{
    DependencyGraph, Task, TaskId, TaskResult, WavePlan, WaveScheduler, find_cycle,
};
use crate::engine::config::RunConfig;
use crate::engine::events::{EventSink, ExecutionEvent, RunSummary};
use crate::engine::runner::WaveRunner;
use crate::engine::state::{RunState, RunStats};
use crate::errors::{Result, TaskwaveError};
use crate::exec::TaskExecutor;

/// Per-run options.
///
/// The executor is mandatory; [`ParallelExecutor::execute_parallel`] fails
/// with [`TaskwaveError::MissingExecutor`] before doing anything else when it
/// is missing.
pub struct RunOptions<P, R> {
    executor: Option<Arc<dyn TaskExecutor<P, R>>>,
    continue_on_error: bool,
    events: Option<mpsc::UnboundedSender<ExecutionEvent>>,
}

impl<P, R> Default for RunOptions<P, R> {
    fn default() -> Self {
        Self {
            executor: None,
            continue_on_error: false,
            events: None,
        }
    }
}

impl<P, R> fmt::Debug for RunOptions<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunOptions")
            .field("executor", &self.executor.is_some())
            .field("continue_on_error", &self.continue_on_error)
            .field("events", &self.events.is_some())
            .finish()
    }
}

impl<P, R> RunOptions<P, R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_executor<E>(mut self, executor: E) -> Self
    where
        E: TaskExecutor<P, R> + 'static,
    {
        self.executor = Some(Arc::new(executor));
        self
    }

    /// Reuse an executor shared with other runs.
    pub fn with_shared_executor(mut self, executor: Arc<dyn TaskExecutor<P, R>>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Tolerant mode: record failures and keep running later waves instead
    /// of aborting after the first wave that contains a failed task.
    pub fn continue_on_error(mut self, enabled: bool) -> Self {
        self.continue_on_error = enabled;
        self
    }

    pub fn with_events(mut self, tx: mpsc::UnboundedSender<ExecutionEvent>) -> Self {
        self.events = Some(tx);
        self
    }
}

/// Aggregated outcome of a run that was not aborted.
#[derive(Debug, Clone)]
pub struct RunReport<R> {
    /// `true` only if every task succeeded.
    pub success: bool,
    /// One result per task, in wave order.
    pub results: Vec<TaskResult<R>>,
    pub total_time: Duration,
    pub waves_executed: usize,
    pub avg_concurrency: f64,
    pub stats: RunStats,
}

impl<R> RunReport<R> {
    pub fn result_for(&self, task: &str) -> Option<&TaskResult<R>> {
        self.results.iter().find(|r| r.task_id == task)
    }

    pub fn failed_tasks(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| !r.success())
            .map(|r| r.task_id.as_str())
            .collect()
    }
}

/// Dependency-aware parallel task runner.
///
/// Holds only immutable configuration; all per-run state lives in the
/// future returned by [`Self::execute_parallel`], so one instance can be
/// shared (e.g. behind an `Arc`) by independent concurrent runs.
#[derive(Debug, Clone)]
pub struct ParallelExecutor {
    config: RunConfig,
    scheduler: WaveScheduler,
}

impl ParallelExecutor {
    pub fn new(config: RunConfig) -> Result<Self> {
        config.validate()?;
        let scheduler = WaveScheduler::from_config(&config);
        Ok(Self { config, scheduler })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Validate the task list and compute its wave plan without running
    /// anything.
    pub fn plan<P>(&self, tasks: &[Task<P>]) -> Result<WavePlan> {
        let graph = DependencyGraph::build(tasks)?;
        self.plan_graph(&graph)
    }

    fn plan_graph<P>(&self, graph: &DependencyGraph<'_, P>) -> Result<WavePlan> {
        if let Some(cycle) = find_cycle(graph) {
            error!(cycle = ?cycle, "circular dependency detected; refusing to run");
            return Err(TaskwaveError::CircularDependency(cycle));
        }
        graph.validate_references()?;
        self.scheduler.plan(graph)
    }

    /// Run every task, wave by wave.
    ///
    /// Structural problems (duplicate ids, cycles, unknown dependencies) are
    /// reported before any executor call. Waves run strictly in sequence;
    /// the tasks inside a wave run concurrently. Unless
    /// [`RunOptions::continue_on_error`] is set, the first wave containing a
    /// failed task ends the run with [`TaskwaveError::WaveAborted`].
    pub async fn execute_parallel<P, R>(
        &self,
        tasks: &[Task<P>],
        options: RunOptions<P, R>,
    ) -> Result<RunReport<R>>
    where
        R: Send + 'static,
    {
        let RunOptions {
            executor,
            continue_on_error,
            events,
        } = options;
        let executor = executor.ok_or(TaskwaveError::MissingExecutor)?;
        let events = EventSink::new(events);
        let started = Instant::now();

        let graph = DependencyGraph::build(tasks)?;
        let plan = self.plan_graph(&graph)?;
        let mut state = RunState::new(plan.waves().iter().flatten().cloned());

        info!(
            tasks = graph.len(),
            waves = plan.len(),
            continue_on_error,
            "starting run"
        );
        events.emit(ExecutionEvent::RunStarted {
            tasks_count: graph.len(),
            waves_count: plan.len(),
        });

        let runner = WaveRunner::new(executor.as_ref(), &self.config, &events);
        let mut results: Vec<TaskResult<R>> = Vec::with_capacity(graph.len());

        for (index, wave) in plan.waves().iter().enumerate() {
            let wave_tasks: Vec<&Task<P>> =
                wave.iter().filter_map(|id| graph.task(id)).collect();

            events.emit(ExecutionEvent::WaveStarted {
                wave: index,
                tasks: wave.clone(),
            });
            state.start_wave(wave);

            let wave_results = runner.run(index, &wave_tasks).await;
            for result in wave_results.iter() {
                state.record(result);
            }
            state.finish_wave();

            let failed: Vec<TaskId> = wave_results
                .iter()
                .filter(|r| !r.success())
                .map(|r| r.task_id.clone())
                .collect();

            events.emit(ExecutionEvent::WaveCompleted {
                wave: index,
                succeeded: wave_results.len() - failed.len(),
                failed: failed.clone(),
            });
            results.extend(wave_results);

            if failed.is_empty() {
                info!(wave = index, "wave completed");
            } else if continue_on_error {
                warn!(wave = index, failed = ?failed, "wave had failures; continuing");
            } else {
                error!(wave = index, failed = ?failed, "wave had failures; aborting run");
                return Err(TaskwaveError::WaveAborted {
                    wave: index,
                    failed,
                });
            }
        }

        let total_time = started.elapsed();
        let stats = state.stats().clone();
        let avg_concurrency = stats.avg_concurrency();
        let success = results.iter().all(TaskResult::success);

        info!(
            success,
            tasks = graph.len(),
            waves = stats.waves_executed,
            total_ms = total_time.as_millis() as u64,
            avg_concurrency,
            retries = stats.retries(),
            "run finished"
        );
        events.emit(ExecutionEvent::RunCompleted(RunSummary {
            tasks_count: graph.len(),
            waves_count: stats.waves_executed,
            total_time,
            avg_concurrency,
        }));

        Ok(RunReport {
            success,
            results,
            total_time,
            waves_executed: stats.waves_executed,
            avg_concurrency,
            stats,
        })
    }
}
