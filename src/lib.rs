// src/lib.rs

//! Dependency-aware parallel task execution.
//!
//! Tasks declare the ids they depend on; [`engine::ParallelExecutor`] checks
//! the dependency graph, groups tasks into waves whose dependencies are all
//! satisfied by earlier waves, and runs each wave concurrently with per-task
//! timeouts and retries.
//!
//! ```no_run
//! use taskwave::dag::Task;
//! use taskwave::engine::{ParallelExecutor, RunConfig, RunOptions};
//! use taskwave::exec::executor_fn;
//!
//! # async fn demo() -> taskwave::errors::Result<()> {
//! let tasks = vec![
//!     Task::new("fetch"),
//!     Task::new("parse").after("fetch"),
//!     Task::new("lint"),
//! ];
//!
//! let engine = ParallelExecutor::new(RunConfig::default())?;
//! let options = RunOptions::new().with_executor(executor_fn(|task: &Task| {
//!     let id = task.id.clone();
//!     async move { Ok::<_, anyhow::Error>(id.len()) }
//! }));
//!
//! let report = engine.execute_parallel(&tasks, options).await?;
//! assert!(report.success);
//! assert_eq!(report.waves_executed, 2);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;

use anyhow::{Result, bail};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::engine::{ExecutionEvent, ParallelExecutor, RunConfig, RunOptions, RunReport};
use crate::exec::{CommandOutput, ShellExecutor};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - plan file loading
/// - CLI overrides of `[config]`
/// - the parallel executor with the shell backend
/// - an event logger task
pub async fn run(args: CliArgs) -> Result<()> {
    let plan = load_and_validate(&args.plan)?;
    let config = apply_overrides(plan.config.clone(), &args);
    let engine = ParallelExecutor::new(config)?;
    let tasks = plan.tasks();

    if args.dry_run {
        let waves = engine.plan(&tasks)?;
        print_dry_run(engine.config(), waves.waves());
        return Ok(());
    }

    let (events_tx, events_rx) = mpsc::unbounded_channel::<ExecutionEvent>();
    let logger = tokio::spawn(log_events(events_rx));

    let options = RunOptions::new()
        .with_executor(ShellExecutor::new())
        .continue_on_error(args.continue_on_error)
        .with_events(events_tx);

    let outcome = engine.execute_parallel(&tasks, options).await;

    // The sender was moved into the run and is dropped by now, so the
    // logger drains what is left and stops.
    if let Err(e) = logger.await {
        warn!(error = %e, "event logger task failed");
    }

    let report = outcome?;
    print_summary(&report);

    if !report.success {
        bail!("{} task(s) failed", report.failed_tasks().len());
    }
    Ok(())
}

fn apply_overrides(mut config: RunConfig, args: &CliArgs) -> RunConfig {
    if let Some(n) = args.max_concurrent {
        config.max_concurrent = n;
    }
    if args.sequential {
        config.enable_parallel = false;
    }
    config
}

async fn log_events(mut rx: mpsc::UnboundedReceiver<ExecutionEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            ExecutionEvent::WaveStarted { wave, tasks } => {
                info!(wave = wave + 1, ?tasks, "wave started");
            }
            ExecutionEvent::WaveCompleted {
                wave,
                succeeded,
                failed,
            } => {
                info!(wave = wave + 1, succeeded, ?failed, "wave completed");
            }
            ExecutionEvent::RunCompleted(summary) => {
                info!(
                    tasks = summary.tasks_count,
                    waves = summary.waves_count,
                    total_ms = summary.total_time.as_millis() as u64,
                    avg_concurrency = summary.avg_concurrency,
                    "run completed"
                );
            }
            other => debug!(event = ?other, "execution event"),
        }
    }
}

/// Dry-run output: print config and the wave plan.
fn print_dry_run(config: &RunConfig, waves: &[Vec<String>]) {
    println!("taskwave dry-run");
    println!("  config.max_concurrent = {}", config.max_concurrent);
    println!("  config.enable_parallel = {}", config.enable_parallel);
    println!("  config.retry_failed = {}", config.retry_failed);
    println!("  config.max_retries = {}", config.max_retries);
    println!("  config.timeout_ms = {}", config.timeout_ms);
    println!("  config.backoff = {:?}", config.backoff);
    println!("  config.retry_base_delay_ms = {}", config.retry_base_delay_ms);
    println!();

    println!("waves ({}):", waves.len());
    for (i, wave) in waves.iter().enumerate() {
        println!("  {}: {}", i + 1, wave.join(", "));
    }

    debug!("dry-run complete (no execution)");
}

fn print_summary(report: &RunReport<CommandOutput>) {
    println!(
        "taskwave: {} task(s) in {} wave(s), {:.2}s, avg concurrency {:.2}",
        report.results.len(),
        report.waves_executed,
        report.total_time.as_secs_f64(),
        report.avg_concurrency
    );
    for result in report.results.iter() {
        match &result.outcome {
            Ok(_) => println!("  ok    {} ({} attempt(s))", result.task_id, result.attempts),
            Err(failure) => println!(
                "  FAIL  {} ({} attempt(s)): {}",
                result.task_id, result.attempts, failure
            ),
        }
    }
}
