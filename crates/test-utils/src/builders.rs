#![allow(dead_code)]

use taskwave::config::{PlanFile, RawPlanFile, TaskConfig};
use taskwave::dag::Task;
use taskwave::engine::RunConfig;
use taskwave::types::BackoffPolicy;

/// Shorthand for a payload-less task with the given dependencies.
pub fn task(id: &str, deps: &[&str]) -> Task {
    Task::new(id).after_all(deps.iter().copied())
}

/// Builder for `RunConfig` with test-friendly defaults: short timeout and
/// a 1ms retry base delay so retries don't slow the suite down.
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RunConfig {
                timeout_ms: 2_000,
                retry_base_delay_ms: 1,
                ..RunConfig::default()
            },
        }
    }

    pub fn max_concurrent(mut self, n: usize) -> Self {
        self.config.max_concurrent = n;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.config.enable_parallel = false;
        self
    }

    pub fn retry_failed(mut self, val: bool) -> Self {
        self.config.retry_failed = val;
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeout_ms = ms;
        self
    }

    pub fn backoff(mut self, policy: BackoffPolicy, base_ms: u64) -> Self {
        self.config.backoff = policy;
        self.config.retry_base_delay_ms = base_ms;
        self
    }

    pub fn build(self) -> RunConfig {
        self.config
    }
}

impl Default for RunConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `PlanFile` to simplify test setup.
pub struct PlanFileBuilder {
    plan: RawPlanFile,
}

impl PlanFileBuilder {
    pub fn new() -> Self {
        Self {
            plan: RawPlanFile {
                config: RunConfig::default(),
                task: Vec::new(),
            },
        }
    }

    pub fn with_config(mut self, config: RunConfig) -> Self {
        self.plan.config = config;
        self
    }

    pub fn with_task(mut self, task: TaskConfig) -> Self {
        self.plan.task.push(task);
        self
    }

    pub fn raw(self) -> RawPlanFile {
        self.plan
    }

    pub fn build(self) -> PlanFile {
        PlanFile::try_from(self.plan).expect("Failed to build valid plan from builder")
    }
}

impl Default for PlanFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new(id: &str, cmd: &str) -> Self {
        Self {
            task: TaskConfig {
                id: id.to_string(),
                cmd: cmd.to_string(),
                after: vec![],
                cwd: None,
            },
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.task.after.push(dep.to_string());
        self
    }

    pub fn cwd(mut self, dir: &str) -> Self {
        self.task.cwd = Some(dir.into());
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}
