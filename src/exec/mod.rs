// src/exec/mod.rs

//! Execution layer.
//!
//! - [`backend`] provides the [`TaskExecutor`] trait the engine calls for
//!   every attempt, plus a closure adapter.
//! - [`shell`] provides [`ShellExecutor`], which runs shell commands using
//!   `tokio::process::Command`.

pub mod backend;
pub mod shell;

pub use backend::{ExecFuture, FnExecutor, TaskExecutor, executor_fn};
pub use shell::{CommandOutput, ShellCommand, ShellExecutor};
