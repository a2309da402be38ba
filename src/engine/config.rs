// src/engine/config.rs

use std::time::Duration;

use serde::Deserialize;

use crate::errors::{Result, TaskwaveError};
use crate::types::BackoffPolicy;

/// Engine configuration, fixed for the lifetime of a [`ParallelExecutor`].
///
/// Doubles as the `[config]` section of a plan file; every key is optional.
///
/// [`ParallelExecutor`]: crate::engine::ParallelExecutor
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Upper bound on the number of tasks placed in one wave. Must be >= 1.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// When false, every wave holds a single task and the run is sequential.
    #[serde(default = "default_true")]
    pub enable_parallel: bool,

    /// When false, a failed attempt is final regardless of `max_retries`.
    #[serde(default = "default_true")]
    pub retry_failed: bool,

    /// Additional attempts after the first one.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Per-attempt timeout in milliseconds. Must be >= 1.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default)]
    pub backoff: BackoffPolicy,

    /// Base interval fed into [`BackoffPolicy::delay`].
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

fn default_max_concurrent() -> usize {
    5
}

fn default_true() -> bool {
    true
}

fn default_max_retries() -> u32 {
    2
}

fn default_timeout_ms() -> u64 {
    300_000
}

fn default_retry_base_delay_ms() -> u64 {
    1_000
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            enable_parallel: true,
            retry_failed: true,
            max_retries: default_max_retries(),
            timeout_ms: default_timeout_ms(),
            backoff: BackoffPolicy::default(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
        }
    }
}

impl RunConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    /// Total number of attempts a task may get, including the first.
    pub fn max_attempts(&self) -> u32 {
        if self.retry_failed {
            self.max_retries.saturating_add(1)
        } else {
            1
        }
    }

    /// Delay to wait after the given (1-based) failed attempt.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff.delay(self.retry_base_delay(), attempt)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent == 0 {
            return Err(TaskwaveError::ConfigError(
                "max_concurrent must be >= 1 (got 0)".to_string(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(TaskwaveError::ConfigError(
                "timeout_ms must be >= 1 (got 0)".to_string(),
            ));
        }
        Ok(())
    }
}
