// src/dag/mod.rs

//! Dependency graph representation and wave planning.
//!
//! - [`task`] defines tasks and their per-run results.
//! - [`graph`] builds the forward/reverse dependency graph for one run.
//! - [`cycle`] validates that the graph is acyclic.
//! - [`scheduler`] turns the graph into ordered waves of runnable tasks.

pub mod cycle;
pub mod graph;
pub mod scheduler;
pub mod task;

pub use cycle::{find_cycle, has_cycle};
pub use graph::{DependencyGraph, DependencyNode};
pub use scheduler::{Wave, WavePlan, WaveScheduler};
pub use task::{Task, TaskId, TaskResult};
