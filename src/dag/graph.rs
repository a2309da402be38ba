// src/dag/graph.rs

use std::collections::HashMap;

use tracing::debug;

use crate::dag::task::{Task, TaskId};
use crate::errors::{Result, TaskwaveError};

/// One task plus its edges in both directions.
#[derive(Debug)]
pub struct DependencyNode<'t, P> {
    pub task: &'t Task<P>,
    /// Direct dependencies: tasks that must finish before this one can run.
    /// Unknown ids are kept here as declared.
    pub dependencies: Vec<TaskId>,
    /// Direct dependents: submitted tasks that list this one as a dependency.
    pub dependents: Vec<TaskId>,
}

/// In-memory dependency graph for a single run, keyed by task id.
///
/// Borrows the submitted tasks and is never mutated once built. Submission
/// order is remembered so that everything derived from the graph (cycle
/// reports, wave order) is deterministic for a given input.
#[derive(Debug)]
pub struct DependencyGraph<'t, P> {
    order: Vec<TaskId>,
    nodes: HashMap<TaskId, DependencyNode<'t, P>>,
}

impl<'t, P> DependencyGraph<'t, P> {
    /// Build the graph from a flat task list.
    ///
    /// Rejects duplicate ids. Dependency ids that do not match a submitted
    /// task are *not* rejected here; see [`Self::validate_references`].
    pub fn build(tasks: &'t [Task<P>]) -> Result<Self> {
        let mut order = Vec::with_capacity(tasks.len());
        let mut nodes: HashMap<TaskId, DependencyNode<'t, P>> =
            HashMap::with_capacity(tasks.len());

        // First pass: create nodes with their dependency lists.
        for task in tasks {
            if nodes.contains_key(&task.id) {
                return Err(TaskwaveError::DuplicateTask(task.id.clone()));
            }
            order.push(task.id.clone());
            nodes.insert(
                task.id.clone(),
                DependencyNode {
                    task,
                    dependencies: task.depends_on.clone(),
                    dependents: Vec::new(),
                },
            );
        }

        // Second pass: reverse edges, only towards submitted tasks.
        for task in tasks {
            for dep in task.depends_on.iter() {
                if let Some(dep_node) = nodes.get_mut(dep) {
                    dep_node.dependents.push(task.id.clone());
                }
            }
        }

        debug!(tasks = order.len(), "dependency graph built");

        Ok(Self { order, nodes })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// All task ids, in submission order.
    pub fn task_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    pub fn node(&self, id: &str) -> Option<&DependencyNode<'t, P>> {
        self.nodes.get(id)
    }

    pub fn task(&self, id: &str) -> Option<&'t Task<P>> {
        self.nodes.get(id).map(|n| n.task)
    }

    /// Immediate dependencies of a task, as declared.
    pub fn dependencies_of(&self, id: &str) -> &[TaskId] {
        self.nodes
            .get(id)
            .map(|n| n.dependencies.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a task.
    pub fn dependents_of(&self, id: &str) -> &[TaskId] {
        self.nodes
            .get(id)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }

    /// `(task, dependency)` pairs whose dependency is not a submitted task.
    pub fn dangling_dependencies(&self) -> Vec<(&str, &str)> {
        let mut dangling = Vec::new();
        for id in self.task_ids() {
            for dep in self.dependencies_of(id) {
                if !self.contains(dep) {
                    dangling.push((id, dep.as_str()));
                }
            }
        }
        dangling
    }

    /// Fail with [`TaskwaveError::UnknownDependency`] on the first dependency
    /// id (in submission order) that does not resolve to a submitted task.
    pub fn validate_references(&self) -> Result<()> {
        match self.dangling_dependencies().first() {
            Some((task, dep)) => Err(TaskwaveError::UnknownDependency {
                task: task.to_string(),
                dependency: dep.to_string(),
            }),
            None => Ok(()),
        }
    }
}
