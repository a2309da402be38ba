// tests/run_orchestration.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use taskwave::dag::Task;
use taskwave::engine::{ExecutionEvent, ParallelExecutor, RunConfig, RunOptions};
use taskwave::errors::TaskwaveError;
use taskwave::exec::executor_fn;
use taskwave_test_utils::builders::{RunConfigBuilder, task};
use taskwave_test_utils::fake_executor::{Behaviour, FakeExecutor};
use taskwave_test_utils::{init_tracing, with_timeout};
use tokio::sync::mpsc;

fn engine(config: RunConfig) -> ParallelExecutor {
    ParallelExecutor::new(config).unwrap()
}

#[tokio::test]
async fn missing_executor_is_rejected_before_anything_runs() {
    let tasks = vec![task("A", &[])];
    let options: RunOptions<(), String> = RunOptions::new();

    let err = engine(RunConfig::default())
        .execute_parallel(&tasks, options)
        .await
        .unwrap_err();

    assert!(matches!(err, TaskwaveError::MissingExecutor));
}

#[tokio::test]
async fn cycle_fails_without_invoking_the_executor() {
    init_tracing();

    let fake = FakeExecutor::new();
    let tasks = vec![task("A", &["B"]), task("B", &["A"]), task("C", &[])];

    let err = engine(RunConfigBuilder::new().build())
        .execute_parallel(&tasks, RunOptions::new().with_executor(fake.clone()))
        .await
        .unwrap_err();

    match err {
        TaskwaveError::CircularDependency(path) => assert_eq!(path, vec!["A", "B", "A"]),
        other => panic!("Expected CircularDependency, got: {:?}", other),
    }
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn unknown_dependency_fails_without_invoking_the_executor() {
    init_tracing();

    let fake = FakeExecutor::new();
    let tasks = vec![task("A", &[]), task("B", &["missing"])];

    let err = engine(RunConfigBuilder::new().build())
        .execute_parallel(&tasks, RunOptions::new().with_executor(fake.clone()))
        .await
        .unwrap_err();

    assert!(err.is_structural());
    assert!(err.to_string().contains("missing"), "{err}");
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn duplicate_ids_fail_before_execution() {
    let fake = FakeExecutor::new();
    let tasks = vec![task("A", &[]), task("A", &[])];

    let err = engine(RunConfigBuilder::new().build())
        .execute_parallel(&tasks, RunOptions::new().with_executor(fake.clone()))
        .await
        .unwrap_err();

    assert!(matches!(err, TaskwaveError::DuplicateTask(ref id) if id == "A"));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn failing_wave_aborts_the_run_and_names_every_failed_task() {
    init_tracing();

    let fake = FakeExecutor::new()
        .with("x", Behaviour::AlwaysFail("x broke".into()))
        .with("y", Behaviour::AlwaysFail("y broke".into()));
    let config = RunConfigBuilder::new().retry_failed(false).build();
    let tasks = vec![
        task("x", &[]),
        task("ok", &[]),
        task("y", &[]),
        task("later", &["ok"]),
    ];

    let err = with_timeout(
        engine(config).execute_parallel(&tasks, RunOptions::new().with_executor(fake.clone())),
    )
    .await
    .unwrap_err();

    match &err {
        TaskwaveError::WaveAborted { wave, failed } => {
            assert_eq!(*wave, 0);
            assert_eq!(failed, &vec!["x".to_string(), "y".to_string()]);
        }
        other => panic!("Expected WaveAborted, got: {:?}", other),
    }
    let msg = err.to_string();
    assert!(msg.contains("x, y"), "{msg}");

    // The healthy sibling still ran; the next wave never started.
    assert_eq!(fake.attempts_for("ok"), 1);
    assert_eq!(fake.attempts_for("later"), 0);
}

#[tokio::test]
async fn continue_on_error_runs_every_wave() {
    init_tracing();

    let fake = FakeExecutor::new().with("x", Behaviour::AlwaysFail("x broke".into()));
    let config = RunConfigBuilder::new().retry_failed(false).build();
    let tasks = vec![task("x", &[]), task("a", &[]), task("b", &["a"])];

    let report = with_timeout(
        engine(config).execute_parallel(
            &tasks,
            RunOptions::new()
                .with_executor(fake.clone())
                .continue_on_error(true),
        ),
    )
    .await
    .unwrap();

    assert!(!report.success);
    assert_eq!(report.results.len(), 3);
    assert_eq!(report.failed_tasks(), vec!["x"]);
    assert!(report.result_for("b").unwrap().success());
    assert_eq!(report.stats.succeeded, 2);
    assert_eq!(report.stats.failed, 1);
}

#[tokio::test]
async fn continue_on_error_still_runs_dependents_of_failed_tasks() {
    init_tracing();

    let fake = FakeExecutor::new().with("x", Behaviour::AlwaysFail("x broke".into()));
    let config = RunConfigBuilder::new().retry_failed(false).build();
    let tasks = vec![task("x", &[]), task("y", &["x"])];

    let report = with_timeout(
        engine(config).execute_parallel(
            &tasks,
            RunOptions::new()
                .with_executor(fake.clone())
                .continue_on_error(true),
        ),
    )
    .await
    .unwrap();

    assert!(!report.success);
    assert_eq!(report.waves_executed, 2);
    assert_eq!(fake.attempts_for("y"), 1);
    assert!(report.result_for("y").unwrap().success());
    assert_eq!(report.failed_tasks(), vec!["x"]);
}

#[tokio::test]
async fn dependents_start_only_after_their_dependencies_finish() {
    init_tracing();

    let fake = FakeExecutor::new()
        .with("A", Behaviour::Delay(Duration::from_millis(30)))
        .with("B", Behaviour::Succeed);
    let tasks = vec![task("B", &["A"]), task("A", &[]), task("C", &[])];

    let report = with_timeout(
        engine(RunConfigBuilder::new().build())
            .execute_parallel(&tasks, RunOptions::new().with_executor(fake.clone())),
    )
    .await
    .unwrap();

    assert!(report.success);
    assert_eq!(fake.started(), vec!["A", "C", "B"]);
    let order: Vec<&str> = report.results.iter().map(|r| r.task_id.as_str()).collect();
    assert_eq!(order, vec!["A", "C", "B"]);
}

#[tokio::test]
async fn report_carries_wave_statistics() {
    init_tracing();

    // Waves: [a, b], [c, d], [e] -> 5 slots over 3 waves.
    let config = RunConfigBuilder::new().max_concurrent(2).build();
    let tasks = vec![
        task("a", &[]),
        task("b", &[]),
        task("c", &[]),
        task("d", &[]),
        task("e", &[]),
    ];

    let (tx, mut rx) = mpsc::unbounded_channel();
    let report = with_timeout(
        engine(config).execute_parallel(
            &tasks,
            RunOptions::new()
                .with_executor(FakeExecutor::new())
                .with_events(tx),
        ),
    )
    .await
    .unwrap();

    assert!(report.success);
    assert_eq!(report.waves_executed, 3);
    assert!((report.avg_concurrency - 5.0 / 3.0).abs() < 1e-9);
    assert_eq!(report.stats.tasks_total, 5);
    assert_eq!(report.stats.execution_slots, 5);

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    assert!(matches!(
        events.first(),
        Some(ExecutionEvent::RunStarted {
            tasks_count: 5,
            waves_count: 3
        })
    ));
    let wave_starts = events
        .iter()
        .filter(|e| matches!(e, ExecutionEvent::WaveStarted { .. }))
        .count();
    assert_eq!(wave_starts, 3);
    match events.last() {
        Some(ExecutionEvent::RunCompleted(summary)) => {
            assert_eq!(summary.tasks_count, 5);
            assert_eq!(summary.waves_count, 3);
        }
        other => panic!("Expected RunCompleted last, got: {:?}", other),
    }
}

#[tokio::test]
async fn empty_task_list_succeeds_with_no_waves() {
    let tasks: Vec<Task> = Vec::new();

    let report = engine(RunConfig::default())
        .execute_parallel(&tasks, RunOptions::new().with_executor(FakeExecutor::new()))
        .await
        .unwrap();

    assert!(report.success);
    assert!(report.results.is_empty());
    assert_eq!(report.waves_executed, 0);
    assert_eq!(report.avg_concurrency, 0.0);
}

#[tokio::test]
async fn wave_tasks_run_concurrently() {
    init_tracing();

    let running = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let exec = {
        let running = Arc::clone(&running);
        let peak = Arc::clone(&peak);
        executor_fn(move |task: &Task| {
            let id = task.id.clone();
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(30)).await;
                running.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, anyhow::Error>(id)
            }
        })
    };

    let config = RunConfigBuilder::new().max_concurrent(3).build();
    let tasks: Vec<Task> = (0..6).map(|i| Task::new(format!("t{i}"))).collect();

    let report = with_timeout(
        engine(config).execute_parallel(&tasks, RunOptions::new().with_executor(exec)),
    )
    .await
    .unwrap();

    assert!(report.success);
    assert_eq!(report.waves_executed, 2);
    assert_eq!(peak.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn one_executor_can_drive_concurrent_runs() {
    init_tracing();

    let engine = Arc::new(engine(RunConfigBuilder::new().build()));
    let first = vec![task("a", &[]), task("b", &["a"])];
    let second = vec![task("a", &[]), task("c", &["a"])];

    let (r1, r2) = with_timeout(async {
        tokio::join!(
            engine.execute_parallel(&first, RunOptions::new().with_executor(FakeExecutor::new())),
            engine.execute_parallel(&second, RunOptions::new().with_executor(FakeExecutor::new())),
        )
    })
    .await;

    let r1 = r1.unwrap();
    let r2 = r2.unwrap();
    assert!(r1.success && r2.success);
    assert!(r1.result_for("b").is_some());
    assert!(r2.result_for("c").is_some());
    assert!(r1.result_for("c").is_none());
}

#[test]
fn zero_concurrency_or_timeout_is_rejected() {
    let err = ParallelExecutor::new(RunConfigBuilder::new().max_concurrent(0).build()).unwrap_err();
    assert!(err.to_string().contains("max_concurrent"));

    let err = ParallelExecutor::new(RunConfigBuilder::new().timeout_ms(0).build()).unwrap_err();
    assert!(err.to_string().contains("timeout_ms"));
}
