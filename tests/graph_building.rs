// tests/graph_building.rs

use taskwave::dag::{DependencyGraph, Task, find_cycle, has_cycle};
use taskwave::errors::TaskwaveError;
use taskwave_test_utils::builders::task;

#[test]
fn graph_records_forward_and_reverse_edges() {
    let tasks = vec![task("A", &[]), task("B", &["A"]), task("C", &["A", "B"])];
    let graph = DependencyGraph::build(&tasks).unwrap();

    assert_eq!(graph.len(), 3);
    assert_eq!(graph.dependencies_of("C"), ["A", "B"]);
    assert_eq!(graph.dependents_of("A"), ["B", "C"]);
    assert_eq!(graph.dependents_of("B"), ["C"]);
    assert!(graph.dependents_of("C").is_empty());

    let ids: Vec<&str> = graph.task_ids().collect();
    assert_eq!(ids, vec!["A", "B", "C"]);
}

#[test]
fn dangling_dependency_is_kept_but_not_linked() {
    let tasks = vec![task("A", &["ghost"])];
    let graph = DependencyGraph::build(&tasks).unwrap();

    assert_eq!(graph.dependencies_of("A"), ["ghost"]);
    assert!(!graph.contains("ghost"));
    assert!(graph.dependents_of("ghost").is_empty());
    assert_eq!(graph.dangling_dependencies(), vec![("A", "ghost")]);

    match graph.validate_references() {
        Err(TaskwaveError::UnknownDependency { task, dependency }) => {
            assert_eq!(task, "A");
            assert_eq!(dependency, "ghost");
        }
        other => panic!("Expected UnknownDependency, got: {:?}", other),
    }
}

#[test]
fn duplicate_task_id_is_rejected() {
    let tasks = vec![task("A", &[]), task("A", &[])];

    match DependencyGraph::build(&tasks) {
        Err(TaskwaveError::DuplicateTask(id)) => assert_eq!(id, "A"),
        other => panic!("Expected DuplicateTask, got: {:?}", other.map(|g| g.len())),
    }
}

#[test]
fn payload_is_reachable_through_the_graph() {
    let tasks = vec![Task::with_payload("A", 42u32)];
    let graph = DependencyGraph::build(&tasks).unwrap();

    assert_eq!(graph.task("A").map(|t| t.payload), Some(42));
    assert!(graph.task("B").is_none());
}

#[test]
fn self_dependency_is_a_cycle() {
    let tasks = vec![task("A", &["A"])];
    let graph = DependencyGraph::build(&tasks).unwrap();

    assert_eq!(find_cycle(&graph), Some(vec!["A".to_string(), "A".to_string()]));
}

#[test]
fn two_node_cycle_is_reported_as_a_closed_path() {
    let tasks = vec![task("A", &["B"]), task("B", &["A"])];
    let graph = DependencyGraph::build(&tasks).unwrap();

    let cycle = find_cycle(&graph).expect("cycle expected");
    assert_eq!(cycle, vec!["A", "B", "A"]);

    let msg = TaskwaveError::CircularDependency(cycle).to_string();
    assert!(msg.contains("A -> B -> A"), "{msg}");
}

#[test]
fn three_node_cycle_behind_an_acyclic_prefix_is_found() {
    let tasks = vec![
        task("root", &[]),
        task("A", &["root", "C"]),
        task("B", &["A"]),
        task("C", &["B"]),
    ];
    let graph = DependencyGraph::build(&tasks).unwrap();

    let cycle = find_cycle(&graph).expect("cycle expected");
    assert_eq!(cycle.first(), cycle.last());
    assert_eq!(cycle.len(), 4);
    for id in ["A", "B", "C"] {
        assert!(cycle.iter().any(|c| c == id), "{id} missing from {cycle:?}");
    }
    assert!(!cycle.iter().any(|c| c == "root"));
}

#[test]
fn diamond_has_no_cycle() {
    let tasks = vec![
        task("A", &[]),
        task("B", &["A"]),
        task("C", &["A"]),
        task("D", &["B", "C"]),
    ];
    let graph = DependencyGraph::build(&tasks).unwrap();

    assert!(!has_cycle(&graph));
}

#[test]
fn unknown_ids_are_ignored_by_cycle_detection() {
    let tasks = vec![task("A", &["ghost"]), task("B", &["A"])];
    let graph = DependencyGraph::build(&tasks).unwrap();

    assert!(!has_cycle(&graph));
}

#[test]
fn very_long_chain_does_not_overflow_the_stack() {
    let n = 10_000;
    let mut tasks = vec![Task::new("t0")];
    for i in 1..n {
        tasks.push(Task::new(format!("t{i}")).after(format!("t{}", i - 1)));
    }
    let graph = DependencyGraph::build(&tasks).unwrap();
    assert!(!has_cycle(&graph));

    // Close the loop and make sure it is still found.
    tasks[0] = Task::new("t0").after(format!("t{}", n - 1));
    let graph = DependencyGraph::build(&tasks).unwrap();
    let cycle = find_cycle(&graph).expect("cycle expected");
    assert_eq!(cycle.len(), n + 1);
}
