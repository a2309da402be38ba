// src/dag/cycle.rs

//! Cycle detection over a [`DependencyGraph`].
//!
//! Depth-first search with a `visited` set and an `on_stack` set; reaching a
//! node that is still on the current DFS path means the dependency relation
//! loops back on itself. The traversal uses an explicit stack so very deep
//! dependency chains cannot overflow the call stack.

use std::collections::HashSet;

use crate::dag::graph::DependencyGraph;
use crate::dag::task::TaskId;

/// Returns `true` if the dependencies among submitted tasks contain a cycle.
pub fn has_cycle<P>(graph: &DependencyGraph<'_, P>) -> bool {
    find_cycle(graph).is_some()
}

/// Find one dependency cycle, if any.
///
/// The returned path follows dependency edges and repeats its first id at
/// the end, e.g. `["A", "B", "A"]` for `A` depending on `B` and `B` on `A`.
/// Dependency ids that are not submitted tasks are ignored.
pub fn find_cycle<P>(graph: &DependencyGraph<'_, P>) -> Option<Vec<TaskId>> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut on_stack: HashSet<&str> = HashSet::new();

    for root in graph.task_ids() {
        if !visited.insert(root) {
            continue;
        }
        on_stack.insert(root);

        // Each frame is (node, index of the next dependency to explore).
        let mut stack: Vec<(&str, usize)> = vec![(root, 0)];

        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;
            let deps = graph.dependencies_of(node);

            if next >= deps.len() {
                on_stack.remove(node);
                stack.pop();
                continue;
            }
            frame.1 += 1;

            let dep = deps[next].as_str();
            if !graph.contains(dep) {
                continue;
            }

            if on_stack.contains(dep) {
                let start = stack.iter().position(|(n, _)| *n == dep).unwrap_or(0);
                let mut cycle: Vec<TaskId> =
                    stack[start..].iter().map(|(n, _)| n.to_string()).collect();
                cycle.push(dep.to_string());
                return Some(cycle);
            }

            if visited.insert(dep) {
                on_stack.insert(dep);
                stack.push((dep, 0));
            }
        }
    }

    None
}
