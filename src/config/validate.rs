// src/config/validate.rs

use std::collections::HashSet;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{PlanFile, RawPlanFile, TaskConfig};
use crate::dag::{DependencyGraph, find_cycle};
use crate::errors::{Result, TaskwaveError};

impl TryFrom<RawPlanFile> for PlanFile {
    type Error = crate::errors::TaskwaveError;

    fn try_from(raw: RawPlanFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_plan(&raw)?;
        Ok(PlanFile::new_unchecked(raw.config, raw.task))
    }
}

fn validate_raw_plan(plan: &RawPlanFile) -> Result<()> {
    ensure_has_tasks(plan)?;
    plan.config.validate()?;
    validate_task_ids(plan)?;
    validate_task_dependencies(plan)?;
    validate_dag(plan)?;
    Ok(())
}

fn ensure_has_tasks(plan: &RawPlanFile) -> Result<()> {
    if plan.task.is_empty() {
        return Err(TaskwaveError::ConfigError(
            "plan must contain at least one [[task]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_task_ids(plan: &RawPlanFile) -> Result<()> {
    let mut seen = HashSet::new();
    for task in plan.task.iter() {
        if task.id.trim().is_empty() {
            return Err(TaskwaveError::ConfigError(
                "task id must not be empty".to_string(),
            ));
        }
        if !seen.insert(task.id.as_str()) {
            return Err(TaskwaveError::DuplicateTask(task.id.clone()));
        }
    }
    Ok(())
}

fn validate_task_dependencies(plan: &RawPlanFile) -> Result<()> {
    let ids: HashSet<&str> = plan.task.iter().map(|t| t.id.as_str()).collect();

    for task in plan.task.iter() {
        for dep in task.after.iter() {
            if !ids.contains(dep.as_str()) {
                return Err(TaskwaveError::ConfigError(format!(
                    "task '{}' has unknown dependency '{}' in `after`",
                    task.id, dep
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(plan: &RawPlanFile) -> Result<()> {
    // Edge direction: dep -> task
    // For:
    //   [[task]]
    //   id = "B"
    //   after = ["A"]
    // we add edge A -> B.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for task in plan.task.iter() {
        graph.add_node(task.id.as_str());
    }

    for task in plan.task.iter() {
        for dep in task.after.iter() {
            graph.add_edge(dep.as_str(), task.id.as_str(), ());
        }
    }

    let sorted = toposort(&graph, None).map_err(|cycle| cycle.node_id().to_string());

    // toposort only names one node on the cycle; the run-time detector gives
    // the whole path (and also catches `after = [self]`).
    let tasks: Vec<_> = plan.task.iter().map(TaskConfig::to_task).collect();
    let deps = DependencyGraph::build(&tasks)?;

    match (sorted, find_cycle(&deps)) {
        (_, Some(path)) => Err(TaskwaveError::CircularDependency(path)),
        (Err(node), None) => Err(TaskwaveError::CircularDependency(vec![node])),
        (Ok(_order), None) => Ok(()),
    }
}
