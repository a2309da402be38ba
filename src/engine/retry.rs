// src/engine/retry.rs

//! Per-task attempt loop: timeout race, retry, backoff.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::dag::{Task, TaskResult};
use crate::engine::config::RunConfig;
use crate::engine::events::{EventSink, ExecutionEvent};
use crate::errors::TaskFailure;
use crate::exec::TaskExecutor;

/// Run `task` until it succeeds or runs out of attempts.
///
/// Attempt failures (executor errors, panics, timeouts) never escape; the
/// caller only ever sees the final [`TaskResult`].
pub(crate) async fn execute_with_retry<P, R>(
    task: &Task<P>,
    executor: &dyn TaskExecutor<P, R>,
    config: &RunConfig,
    events: &EventSink,
) -> TaskResult<R>
where
    R: Send + 'static,
{
    let started = Instant::now();
    let max_attempts = config.max_attempts();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        debug!(task = %task.id, attempt, max_attempts, "starting attempt");

        let failure = match run_attempt(task, executor, config).await {
            Ok(value) => {
                debug!(task = %task.id, attempt, "attempt succeeded");
                return TaskResult::succeeded(task.id.clone(), value, attempt, started.elapsed());
            }
            Err(failure) => failure,
        };

        if attempt >= max_attempts {
            warn!(
                task = %task.id,
                attempts = attempt,
                error = %failure,
                "task failed; no attempts left"
            );
            return TaskResult::failed(task.id.clone(), failure, attempt, started.elapsed());
        }

        let delay = config.backoff_delay(attempt);
        warn!(
            task = %task.id,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %failure,
            "attempt failed; retrying"
        );
        events.emit(ExecutionEvent::TaskRetrying {
            task: task.id.clone(),
            attempt,
            delay,
            error: failure.to_string(),
        });

        sleep(delay).await;
    }
}

/// One attempt, raced against the configured timeout.
///
/// The executor future is spawned so that on timeout it can be abandoned
/// rather than dropped: it keeps running in the background and whatever it
/// eventually returns is discarded. A panic either while building the future
/// or while polling it fails the attempt instead of unwinding into the wave.
async fn run_attempt<P, R>(
    task: &Task<P>,
    executor: &dyn TaskExecutor<P, R>,
    config: &RunConfig,
) -> Result<R, TaskFailure>
where
    R: Send + 'static,
{
    let limit = config.timeout();
    let future = match panic::catch_unwind(AssertUnwindSafe(|| executor.execute(task))) {
        Ok(future) => future,
        Err(payload) => return Err(panicked(payload.as_ref())),
    };
    let handle = tokio::spawn(future);

    match timeout(limit, handle).await {
        Ok(Ok(Ok(value))) => Ok(value),
        Ok(Ok(Err(err))) => Err(TaskFailure::Execution(format!("{err:#}"))),
        Ok(Err(join_err)) if join_err.is_panic() => Err(panicked(join_err.into_panic().as_ref())),
        Ok(Err(join_err)) => Err(TaskFailure::Execution(format!(
            "attempt was cancelled: {join_err}"
        ))),
        Err(_elapsed) => {
            debug!(task = %task.id, timeout_ms = limit.as_millis() as u64, "attempt timed out; abandoning it");
            Err(TaskFailure::TimedOut(limit))
        }
    }
}

fn panicked(payload: &(dyn Any + Send)) -> TaskFailure {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    TaskFailure::Execution(format!("executor panicked: {message}"))
}
