// src/engine/runner.rs

use futures::future::join_all;
use tracing::info;

use crate::dag::{Task, TaskResult};
use crate::engine::config::RunConfig;
use crate::engine::events::EventSink;
use crate::engine::retry::execute_with_retry;
use crate::exec::TaskExecutor;

/// Executes one wave: every task is launched at once and the wave settles
/// only when all of them have a final result. A failing task never cancels
/// its siblings.
pub(crate) struct WaveRunner<'a, P, R> {
    executor: &'a dyn TaskExecutor<P, R>,
    config: &'a RunConfig,
    events: &'a EventSink,
}

impl<'a, P, R> WaveRunner<'a, P, R>
where
    R: Send + 'static,
{
    pub(crate) fn new(
        executor: &'a dyn TaskExecutor<P, R>,
        config: &'a RunConfig,
        events: &'a EventSink,
    ) -> Self {
        Self {
            executor,
            config,
            events,
        }
    }

    /// Results are returned in the order of `tasks`.
    pub(crate) async fn run(&self, wave: usize, tasks: &[&Task<P>]) -> Vec<TaskResult<R>> {
        info!(wave, size = tasks.len(), "launching wave");

        let attempts = tasks
            .iter()
            .map(|task| execute_with_retry(*task, self.executor, self.config, self.events));

        join_all(attempts).await
    }
}
