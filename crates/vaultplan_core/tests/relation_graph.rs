use vaultplan_core::{Direction, RelationGraph, RelationKind, TaskIndex, TaskRecord};

#[test]
fn neighbors_follow_insertion_order_in_both_directions() {
    let mut graph = RelationGraph::new();
    assert!(graph.add_edge(RelationKind::DependsOn, "deploy", "build"));
    assert!(graph.add_edge(RelationKind::DependsOn, "deploy", "test"));
    assert!(graph.add_edge(RelationKind::PartOf, "deploy", "release"));

    assert_eq!(
        graph.neighbors("deploy", RelationKind::DependsOn, Direction::Out),
        vec!["build", "test"]
    );
    assert_eq!(
        graph.neighbors("build", RelationKind::DependsOn, Direction::In),
        vec!["deploy"]
    );
    assert!(graph
        .neighbors("deploy", RelationKind::PartOf, Direction::In)
        .is_empty());
}

#[test]
fn identical_edges_are_stored_once_but_kinds_are_distinct() {
    let mut graph = RelationGraph::new();
    assert!(graph.add_edge(RelationKind::DependsOn, "a", "b"));
    assert!(!graph.add_edge(RelationKind::DependsOn, "a", "b"));
    assert!(graph.add_edge(RelationKind::PartOf, "a", "b"));
    assert_eq!(graph.edges().len(), 2);
}

#[test]
fn post_order_visits_dependencies_first_and_every_node_once() {
    let mut graph = RelationGraph::new();
    for id in ["ship", "write", "review", "idle"] {
        graph.add_node(id);
    }
    graph.add_edge(RelationKind::DependsOn, "ship", "review");
    graph.add_edge(RelationKind::DependsOn, "review", "write");

    let order: Vec<&str> = graph
        .walk_post_order_all(RelationKind::DependsOn, Direction::Out)
        .collect();
    assert_eq!(order, vec!["write", "review", "ship", "idle"]);
}

#[test]
fn cycles_and_self_loops_are_walked_and_reported() {
    let mut graph = RelationGraph::new();
    graph.add_edge(RelationKind::DependsOn, "a", "b");
    graph.add_edge(RelationKind::DependsOn, "b", "a");
    graph.add_edge(RelationKind::DependsOn, "c", "c");
    graph.add_edge(RelationKind::DependsOn, "d", "a");

    let mut order: Vec<&str> = graph
        .walk_post_order_all(RelationKind::DependsOn, Direction::Out)
        .collect();
    assert_eq!(order.len(), 4);
    order.sort();
    order.dedup();
    assert_eq!(order.len(), 4);

    assert_eq!(graph.cycle_members(RelationKind::DependsOn), vec!["a", "b", "c"]);
    assert!(graph.cycle_members(RelationKind::PartOf).is_empty());
}

#[test]
fn task_index_builds_edges_from_relation_markers() {
    let index = TaskIndex::build(vec![
        TaskRecord::new("child", "child").child_of("parent").depending_on("prep"),
        TaskRecord::new("parent", "parent"),
        TaskRecord::new("prep", "prep"),
        TaskRecord::new(" child ", "dup"),
    ]);

    assert_eq!(index.len(), 3);
    assert_eq!(index.child_count("parent"), 1);
    assert_eq!(index.parent_count("child"), 1);
    assert_eq!(index.prerequisite_count("child"), 1);
    assert!(index
        .diagnostics()
        .iter()
        .any(|line| line.contains("duplicate task id `child`")));
}

#[test]
fn dependency_cycles_surface_as_index_diagnostics() {
    let index = TaskIndex::build(vec![
        TaskRecord::new("a", "a").depending_on("b"),
        TaskRecord::new("b", "b").depending_on("a"),
    ]);
    assert!(index
        .diagnostics()
        .iter()
        .any(|line| line == "dependsOn cycle involves: a, b"));
}
