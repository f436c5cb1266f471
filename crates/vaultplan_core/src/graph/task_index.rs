//! Caller-constructed task index.
//!
//! # Responsibility
//! - Hold one planning snapshot: task records plus their relation graph.
//! - Replace any process-wide task lookup table; engines receive the index
//!   explicitly.
//!
//! # Invariants
//! - The first record with a given id wins; later duplicates are dropped and
//!   reported in `diagnostics()`.
//! - Relation markers pointing at unknown ids still produce edges, so a
//!   missing prerequisite keeps counting as a prerequisite.

use crate::graph::relation_graph::{Direction, RelationGraph, RelationKind};
use crate::model::task::TaskRecord;
use log::debug;
use std::collections::HashMap;

/// Immutable snapshot of tasks and relations for one planning run.
#[derive(Debug, Clone, Default)]
pub struct TaskIndex {
    tasks: Vec<TaskRecord>,
    by_id: HashMap<String, usize>,
    graph: RelationGraph,
    diagnostics: Vec<String>,
}

impl TaskIndex {
    /// Builds the index and its relation graph from raw records.
    pub fn build(records: Vec<TaskRecord>) -> Self {
        let mut index = Self::default();

        for mut record in records {
            let id = record.id.trim().to_string();
            if id.is_empty() {
                index
                    .diagnostics
                    .push("task without id skipped".to_string());
                continue;
            }
            if index.by_id.contains_key(&id) {
                index
                    .diagnostics
                    .push(format!("duplicate task id `{id}` dropped (first wins)"));
                continue;
            }
            index.graph.add_node(&id);
            record.id = id.clone();
            index.by_id.insert(id, index.tasks.len());
            index.tasks.push(record);
        }

        for position in 0..index.tasks.len() {
            let (id, prerequisites, parents) = {
                let task = &index.tasks[position];
                (
                    task.id.clone(),
                    task.depends_on.clone(),
                    task.part_of.clone(),
                )
            };
            for prerequisite in prerequisites.iter().map(|p| p.trim()).filter(|p| !p.is_empty()) {
                index
                    .graph
                    .add_edge(RelationKind::DependsOn, &id, prerequisite);
            }
            for parent in parents.iter().map(|p| p.trim()).filter(|p| !p.is_empty()) {
                index.graph.add_edge(RelationKind::PartOf, &id, parent);
            }
        }

        for kind in [RelationKind::DependsOn, RelationKind::PartOf] {
            let members = index.graph.cycle_members(kind);
            if !members.is_empty() {
                index.diagnostics.push(format!(
                    "{} cycle involves: {}",
                    relation_label(kind),
                    members.join(", ")
                ));
            }
        }

        debug!(
            "event=task_index_build module=graph status=ok tasks={} edges={} diagnostics={}",
            index.tasks.len(),
            index.graph.edges().len(),
            index.diagnostics.len()
        );
        index
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Records in input order, duplicates removed.
    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&TaskRecord> {
        self.by_id.get(id.trim()).map(|position| &self.tasks[*position])
    }

    pub fn graph(&self) -> &RelationGraph {
        &self.graph
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// Number of `id`'s prerequisites.
    pub fn prerequisite_count(&self, id: &str) -> usize {
        self.graph
            .degree(id.trim(), RelationKind::DependsOn, Direction::Out)
    }

    /// Number of `id`'s sub-parts.
    pub fn child_count(&self, id: &str) -> usize {
        self.graph.degree(id.trim(), RelationKind::PartOf, Direction::In)
    }

    /// Number of containers `id` belongs to.
    pub fn parent_count(&self, id: &str) -> usize {
        self.graph.degree(id.trim(), RelationKind::PartOf, Direction::Out)
    }
}

fn relation_label(kind: RelationKind) -> &'static str {
    match kind {
        RelationKind::DependsOn => "dependsOn",
        RelationKind::PartOf => "partOf",
    }
}
