// src/engine/mod.rs

//! Execution engine.
//!
//! This module ties together:
//! - the wave plan computed by [`crate::dag`]
//! - the per-task retry/timeout loop (`retry`)
//! - concurrent execution of one wave (`runner`)
//! - run orchestration, abort/continue decisions and statistics
//!   ([`parallel`], [`state`])
//! - progress notifications ([`events`])

pub mod config;
pub mod events;
pub mod parallel;
mod retry;
mod runner;
pub mod state;

pub use config::RunConfig;
pub use events::{ExecutionEvent, RunSummary};
pub use parallel::{ParallelExecutor, RunOptions, RunReport};
pub use state::{RunState, RunStats};
